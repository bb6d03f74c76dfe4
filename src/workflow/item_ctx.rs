//! 条目处理上下文
//!
//! 封装"我正在处理第几个条目、第几个片段"这一信息

use std::fmt::Display;

/// 条目处理上下文（仅用于日志）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemCtx {
    /// 条目序号（从1开始）
    pub item_index: usize,
    /// 条目总数
    pub total: usize,
    /// 拆分片段序号与片段总数
    pub fragment: Option<(usize, usize)>,
}

impl ItemCtx {
    pub fn new(item_index: usize, total: usize) -> Self {
        Self {
            item_index,
            total,
            fragment: None,
        }
    }

    /// 派生片段上下文
    pub fn fragment(&self, index: usize, count: usize) -> Self {
        Self {
            fragment: Some((index, count)),
            ..self.clone()
        }
    }
}

impl Display for ItemCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.fragment {
            Some((index, count)) => write!(
                f,
                "[条目 {}/{} 片段 {}/{}]",
                self.item_index, self.total, index, count
            ),
            None => write!(f, "[条目 {}/{}]", self.item_index, self.total),
        }
    }
}
