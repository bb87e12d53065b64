use serde::Deserialize;

/// `?limit=10&page=1` query parameters shared by the list endpoints.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Pagination {
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default = "default_page")]
    pub page: i64,
}

fn default_limit() -> i64 {
    10
}

fn default_page() -> i64 {
    1
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            limit: default_limit(),
            page: default_page(),
        }
    }
}

impl Pagination {
    pub fn capped_limit(&self) -> i64 {
        self.limit.clamp(1, 100)
    }

    pub fn offset(&self) -> i64 {
        (self.page.max(1) - 1) * self.capped_limit()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_first_page_of_ten() {
        let p = Pagination::default();
        assert_eq!(p.capped_limit(), 10);
        assert_eq!(p.offset(), 0);
    }

    #[test]
    fn offset_derives_from_page() {
        let p = Pagination { limit: 20, page: 3 };
        assert_eq!(p.offset(), 40);
    }

    #[test]
    fn clamps_hostile_values() {
        let p = Pagination {
            limit: 10_000,
            page: -5,
        };
        assert_eq!(p.capped_limit(), 100);
        assert_eq!(p.offset(), 0);
    }
}
