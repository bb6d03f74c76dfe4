//! 输入拆分 - 业务能力层
//!
//! 把一个整体查询失败的输入按字符位置切成几段

/// 把 `input` 按字符切成 `parts` 段
///
/// 前面的段宽度为 `ceil(字符数 / parts)`，但每段都要给后面的段至少留一个字符，
/// 所以字符数不少于 `parts` 时恰好得到 `parts` 个非空段。
/// 字符数少于 `parts` 时每个字符一段，不产生空段。
/// 各段首尾相接恰好还原原输入。
pub fn split_input(input: &str, parts: usize) -> Vec<String> {
    let chars: Vec<char> = input.chars().collect();
    if chars.is_empty() {
        return Vec::new();
    }
    let parts = parts.clamp(1, chars.len());
    let width = chars.len().div_ceil(parts);

    let mut fragments = Vec::with_capacity(parts);
    let mut start = 0;
    for index in 0..parts {
        let remaining = chars.len() - start;
        let parts_after = parts - index - 1;
        let size = width.min(remaining - parts_after);
        fragments.push(chars[start..start + size].iter().collect());
        start += size;
    }
    fragments
}
