//! 运行统计
//!
//! 只由运行协调器修改，且只在条目得到最终结果之后修改

use std::fmt;

use crate::workflow::outcome::Outcome;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunStats {
    /// 原始条目总数
    pub total: usize,
    pub successful_queries: usize,
    pub failed_queries: usize,
    pub successful_downloads: usize,
    pub failed_downloads: usize,
    /// 实际发出的尝试次数（拆分会让它超过 total）
    pub attempts_issued: usize,
    /// 数据源中被跳过的记录
    pub skipped_records: usize,
}

impl RunStats {
    pub fn new(total: usize) -> Self {
        Self {
            total,
            ..Self::default()
        }
    }

    /// 计入一个条目的最终结果
    ///
    /// 拆分过的条目按片段逐个计数，而不是按一个条目计数。
    pub fn record(&mut self, outcome: &Outcome) {
        self.attempts_issued += outcome.attempts_issued;
        for succeeded in outcome.leaf_results() {
            if succeeded {
                self.successful_queries += 1;
                self.successful_downloads += 1;
            } else {
                self.failed_queries += 1;
                self.failed_downloads += 1;
            }
        }
    }

    /// 计过数的叶子数（直接处理的条目 + 所有片段）
    pub fn leaf_count(&self) -> usize {
        self.successful_queries + self.failed_queries
    }

    /// 下载计数不会超过发出的尝试次数
    pub fn is_consistent(&self) -> bool {
        self.successful_downloads + self.failed_downloads <= self.attempts_issued
            && self.successful_queries + self.failed_queries
                == self.successful_downloads + self.failed_downloads
    }
}

impl RunStats {
    /// 统计文本，总数一行使用 `total_label`（例如 "总SKU数" / "总记录数"）
    pub fn report(&self, total_label: &str) -> String {
        format!(
            "{}: {}\n成功查询次数: {}\n失败查询次数: {}\n成功下载次数: {}\n失败下载次数: {}",
            total_label,
            self.total,
            self.successful_queries,
            self.failed_queries,
            self.successful_downloads,
            self.failed_downloads
        )
    }
}

impl fmt::Display for RunStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.report("总SKU数"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::WorkItem;
    use crate::workflow::attempt::{ExecutionFailure, StepFailure};
    use crate::workflow::outcome::{FragmentOutcome, OutcomeStatus};

    fn outcome(status: OutcomeStatus, fragments: Vec<(&str, bool)>, attempts: usize) -> Outcome {
        Outcome {
            item: WorkItem::new("DS04604"),
            status,
            attempts_issued: attempts,
            failure: (status != OutcomeStatus::Succeeded).then(|| ExecutionFailure::RetriesExhausted {
                attempts: 3,
                last: StepFailure::SaveDialogTimeout,
            }),
            fragments: fragments
                .into_iter()
                .map(|(input, succeeded)| FragmentOutcome {
                    input: input.to_string(),
                    succeeded,
                    attempts_issued: 1,
                })
                .collect(),
        }
    }

    #[test]
    fn direct_success_counts_once() {
        let mut stats = RunStats::new(1);
        stats.record(&outcome(OutcomeStatus::Succeeded, vec![], 1));
        assert_eq!(stats.successful_queries, 1);
        assert_eq!(stats.successful_downloads, 1);
        assert_eq!(stats.failed_queries, 0);
        assert!(stats.is_consistent());
    }

    #[test]
    fn split_fragments_count_individually() {
        let mut stats = RunStats::new(1);
        stats.record(&outcome(
            OutcomeStatus::PartiallyFailed,
            vec![("DS0", true), ("460", true), ("4", false)],
            9,
        ));
        assert_eq!(stats.successful_queries, 2);
        assert_eq!(stats.failed_queries, 1);
        assert_eq!(stats.successful_downloads, 2);
        assert_eq!(stats.failed_downloads, 1);
        assert_eq!(stats.leaf_count(), 3);
        assert!(stats.is_consistent());
    }

    #[test]
    fn report_lists_counters_in_fixed_order() {
        let stats = RunStats {
            total: 5,
            successful_queries: 4,
            failed_queries: 1,
            successful_downloads: 4,
            failed_downloads: 1,
            ..RunStats::default()
        };
        let lines: Vec<String> = stats.to_string().lines().map(str::to_string).collect();
        assert_eq!(
            lines,
            vec![
                "总SKU数: 5",
                "成功查询次数: 4",
                "失败查询次数: 1",
                "成功下载次数: 4",
                "失败下载次数: 1",
            ]
        );
    }

    #[test]
    fn report_uses_the_given_total_label() {
        let stats = RunStats::new(2);
        let report = stats.report("总记录数");
        assert_eq!(report.lines().next(), Some("总记录数: 2"));
        assert!(!report.contains("总SKU数"));
        assert_eq!(report.lines().count(), 5);
    }
}
