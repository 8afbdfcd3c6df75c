//! 区间切分：把 `[0, total)` 按固定块大小切成互不重叠、首尾相接的半开区间。

use std::num::NonZeroU64;

use crate::internal::blob::request_headers::range_header;

/// 单个分段请求，表示半开区间 `[offset, offset + length)`，`length > 0`。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangeRequest {
    pub offset: u64,
    pub length: u64,
}

impl RangeRequest {
    /// 不含上界的结束偏移
    pub fn end(&self) -> u64 {
        self.offset + self.length
    }

    /// `x-ms-range` 的值
    pub fn range_header(&self) -> String {
        range_header(self.offset, self.end())
    }
}

/// 按块大小依次产出分段；最后一段截断到 `total`，恰好产出一次。`total == 0` 时不产出任何分段。
#[derive(Debug, Clone)]
pub struct RangePlan {
    total: u64,
    block_size: u64,
    cur: u64,
}

impl RangePlan {
    pub fn new(total: u64, block_size: NonZeroU64) -> Self {
        Self {
            total,
            block_size: block_size.get(),
            cur: 0,
        }
    }

    /// 尚未产出的分段数
    pub fn range_count(&self) -> u64 {
        (self.total - self.cur).div_ceil(self.block_size)
    }
}

impl Iterator for RangePlan {
    type Item = RangeRequest;

    fn next(&mut self) -> Option<Self::Item> {
        if self.cur >= self.total {
            return None;
        }
        let offset = self.cur;
        let length = self.block_size.min(self.total - offset);
        self.cur = offset + length;
        Some(RangeRequest { offset, length })
    }
}
