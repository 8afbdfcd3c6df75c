//! 分段调度的基础件：区间切分、有界并发任务组、进度计数。

pub mod progress;
pub mod range_plan;
pub mod task_group;
