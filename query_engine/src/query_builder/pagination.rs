use crate::errors::{QueryBuilderError, QueryResult};
use crate::query_builder::operators::{LIMIT, OFFSET};
use serde::{Deserialize, Serialize};

/// Pagination configuration, pages are 1-indexed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: u64,
    pub page_size: u64,
}

impl Pagination {
    pub fn new(page: u64, page_size: u64) -> Self {
        Self { page, page_size }
    }

    pub fn limit(&self) -> u64 {
        self.page_size
    }

    pub fn offset(&self) -> QueryResult<u64> {
        if self.page == 0 {
            return Err(QueryBuilderError::InvalidDataType(
                "pagination page starts at 1".to_string(),
            ));
        }
        self.page_size.checked_mul(self.page - 1).ok_or_else(|| {
            QueryBuilderError::InvalidDataType(format!(
                "page {} with page size {} overflows the offset",
                self.page, self.page_size
            ))
        })
    }

    /// ` LIMIT n OFFSET m`, with the leading space so it appends to a statement
    pub fn to_sql(&self) -> QueryResult<String> {
        Ok(format!("{}{}{}{}", LIMIT, self.limit(), OFFSET, self.offset()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_page() {
        assert_eq!(Pagination::new(1, 10).to_sql().unwrap(), " LIMIT 10 OFFSET 0");
    }

    #[test]
    fn test_third_page() {
        assert_eq!(Pagination::new(3, 20).to_sql().unwrap(), " LIMIT 20 OFFSET 40");
    }

    #[test]
    fn test_page_zero_rejected() {
        assert!(matches!(
            Pagination::new(0, 10).to_sql(),
            Err(QueryBuilderError::InvalidDataType(_))
        ));
    }

    #[test]
    fn test_offset_overflow_rejected() {
        assert!(Pagination::new(u64::MAX, u64::MAX).offset().is_err());
    }
}
