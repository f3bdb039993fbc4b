//! Pagination types for list endpoints.

use serde::{Deserialize, Serialize};

/// Request parameters for offset-based paginated queries.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PageRequest {
    /// Number of rows to skip.
    #[serde(default)]
    pub offset: u64,
    /// Maximum number of rows to return.
    #[serde(default = "default_limit")]
    pub limit: u64,
}

fn default_limit() -> u64 {
    50
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            offset: 0,
            limit: default_limit(),
        }
    }
}

impl PageRequest {
    /// Clamps the limit to the given maximum (and at least 1).
    #[must_use]
    pub fn clamped(self, max_limit: u64) -> Self {
        Self {
            offset: self.offset,
            limit: self.limit.clamp(1, max_limit),
        }
    }
}

/// Pagination metadata returned alongside paginated data.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PageMeta {
    /// Total number of rows across all pages.
    pub total: u64,
    /// Offset used for this page.
    pub offset: u64,
    /// Limit used for this page.
    pub limit: u64,
    /// Whether rows remain beyond this page.
    pub has_more: bool,
}

impl PageMeta {
    /// Builds pagination metadata from a request and the total row count.
    #[must_use]
    pub fn new(request: PageRequest, total: u64) -> Self {
        Self {
            total,
            offset: request.offset,
            limit: request.limit,
            has_more: request.offset.saturating_add(request.limit) < total,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0, 50, 100, true)]
    #[case(50, 50, 100, false)]
    #[case(0, 50, 0, false)]
    #[case(90, 50, 100, false)]
    #[case(u64::MAX, 50, 100, false)]
    #[case(50, u64::MAX, 100, false)]
    fn test_has_more(
        #[case] offset: u64,
        #[case] limit: u64,
        #[case] total: u64,
        #[case] expected: bool,
    ) {
        let meta = PageMeta::new(PageRequest { offset, limit }, total);
        assert_eq!(meta.has_more, expected);
    }

    #[test]
    fn test_clamped_limit() {
        let request = PageRequest {
            offset: 10,
            limit: 500,
        };
        let clamped = request.clamped(100);
        assert_eq!(clamped.limit, 100);
        assert_eq!(clamped.offset, 10);

        let zero = PageRequest {
            offset: 0,
            limit: 0,
        };
        assert_eq!(zero.clamped(100).limit, 1);
    }
}
