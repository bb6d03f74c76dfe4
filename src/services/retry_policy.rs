//! 重试策略 - 业务能力层
//!
//! 只回答"这次失败之后还要不要再试、等多久"，不接触界面

use std::time::Duration;

use crate::config::Config;
use crate::workflow::attempt::StepFailure;

/// 停止重试的原因
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    NotRetryable,
    AttemptsExhausted,
}

/// 重试决定
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    RetryAfter(Duration),
    Stop(StopReason),
}

/// 有上限的重试策略
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// 最多尝试几次（含第一次），至少为 1
    pub max_attempts: usize,
    pub base_delay: Duration,
    /// 每次重试等待的增长倍数，1 表示固定间隔
    pub factor: u32,
    pub max_delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: usize, base_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay,
            factor: 1,
            max_delay: Duration::from_secs(60),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self {
            max_attempts: config.max_retries.max(1),
            base_delay: config.timings.retry_base_delay,
            factor: config.retry_backoff_factor.max(1),
            max_delay: config.retry_max_delay,
        }
    }

    /// 第 `attempt_no` 次尝试（从 1 开始）失败后的决定
    pub fn decide(&self, attempt_no: usize, failure: &StepFailure) -> RetryDecision {
        if !failure.is_retryable() {
            return RetryDecision::Stop(StopReason::NotRetryable);
        }
        if attempt_no >= self.max_attempts {
            return RetryDecision::Stop(StopReason::AttemptsExhausted);
        }
        RetryDecision::RetryAfter(self.delay_after(attempt_no))
    }

    /// 指数退避：base * factor^(attempt_no - 1)，不超过 max_delay
    pub fn delay_after(&self, attempt_no: usize) -> Duration {
        let exp = attempt_no.saturating_sub(1).min(u32::MAX as usize) as u32;
        let multiplier = self.factor.saturating_pow(exp);
        self.base_delay
            .saturating_mul(multiplier)
            .min(self.max_delay)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflow::attempt::Step;

    fn timeout() -> StepFailure {
        StepFailure::QueryTimeout {
            step: Step::WaitReady,
        }
    }

    #[test]
    fn retries_until_budget_is_spent() {
        let policy = RetryPolicy::new(3, Duration::from_secs(5));
        assert_eq!(
            policy.decide(1, &timeout()),
            RetryDecision::RetryAfter(Duration::from_secs(5))
        );
        assert_eq!(
            policy.decide(2, &timeout()),
            RetryDecision::RetryAfter(Duration::from_secs(5))
        );
        assert_eq!(
            policy.decide(3, &timeout()),
            RetryDecision::Stop(StopReason::AttemptsExhausted)
        );
    }

    #[test]
    fn fatal_failures_stop_immediately() {
        let policy = RetryPolicy::new(3, Duration::ZERO);
        assert_eq!(
            policy.decide(1, &StepFailure::InputFieldMissing),
            RetryDecision::Stop(StopReason::NotRetryable)
        );
    }

    #[test]
    fn single_attempt_budget_never_retries() {
        let policy = RetryPolicy::new(1, Duration::ZERO);
        assert_eq!(
            policy.decide(1, &StepFailure::SaveDialogTimeout),
            RetryDecision::Stop(StopReason::AttemptsExhausted)
        );
    }

    #[test]
    fn zero_budget_is_raised_to_one() {
        assert_eq!(RetryPolicy::new(0, Duration::ZERO).max_attempts, 1);
    }

    #[test]
    fn backoff_grows_and_is_capped() {
        let policy = RetryPolicy {
            max_attempts: 10,
            base_delay: Duration::from_secs(1),
            factor: 2,
            max_delay: Duration::from_secs(5),
        };
        assert_eq!(policy.delay_after(1), Duration::from_secs(1));
        assert_eq!(policy.delay_after(2), Duration::from_secs(2));
        assert_eq!(policy.delay_after(3), Duration::from_secs(4));
        assert_eq!(policy.delay_after(4), Duration::from_secs(5));
        assert_eq!(policy.delay_after(60), Duration::from_secs(5));
    }
}
