//! 服务名建议
//!
//! 查找失败时，从本地注册的服务名里挑出调用方可能想要的那些：
//! 编辑距离不超过请求名长度的三分之一（向下取整），或者包含请求名。

use strsim::levenshtein;

/// 计算候选服务名
///
/// 空请求名直接返回空集合，不做任何扫描。返回顺序跟随 `known` 的顺序，
/// 调用方不应依赖它。
pub fn suggest_alternatives<'a, I>(requested: &str, known: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    if requested.is_empty() {
        return Vec::new();
    }

    let max_distance = requested.chars().count() / 3;
    known
        .into_iter()
        .filter(|candidate| {
            levenshtein(requested, candidate) <= max_distance || candidate.contains(requested)
        })
        .map(str::to_string)
        .collect()
}
