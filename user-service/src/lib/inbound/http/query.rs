use std::collections::HashMap;

use crate::domain::user::models::ListQuery;
use crate::domain::user::models::SortField;
use crate::domain::user::models::SortOrder;
use crate::domain::user::models::UserFilter;

/// Query parameter names with a meaning of their own; everything else is
/// treated as a column filter.
const RESERVED: [&str; 4] = ["page", "limit", "sort_by", "keyword"];

/// Build a listing query from raw query parameters.
///
/// `sort_by` takes an optional `+`/`-` direction prefix (`-created_at`).
/// Unparsable `page`/`limit` values fall back to their defaults, unknown
/// filter names are dropped.
pub fn list_query_from_params(params: &HashMap<String, String>) -> ListQuery {
    let page = params
        .get("page")
        .and_then(|v| v.parse::<i64>().ok())
        .filter(|p| *p >= 1)
        .unwrap_or(1);

    let per_page = params
        .get("limit")
        .and_then(|v| v.parse::<i64>().ok())
        .filter(|l| *l >= 1)
        .unwrap_or(ListQuery::DEFAULT_PER_PAGE);

    let sort_param = params.get("sort_by").map(String::as_str).unwrap_or("+id");
    let (order, field) = match sort_param.strip_prefix('-') {
        Some(rest) => (SortOrder::Desc, rest),
        None => (
            SortOrder::Asc,
            sort_param.strip_prefix('+').unwrap_or(sort_param),
        ),
    };

    let keyword = params.get("keyword").filter(|k| !k.is_empty()).cloned();

    let mut filters = Vec::new();
    for (key, value) in params {
        if RESERVED.contains(&key.as_str()) {
            continue;
        }
        match key.as_str() {
            "username" => filters.push(UserFilter::Username(value.clone())),
            "fullname" => filters.push(UserFilter::Fullname(value.clone())),
            "role" => filters.push(UserFilter::Role(value.clone())),
            "is_active" => {
                if let Ok(flag) = value.parse::<bool>() {
                    filters.push(UserFilter::IsActive(flag));
                }
            }
            _ => {}
        }
    }

    ListQuery {
        page,
        per_page,
        sort_by: SortField::parse_or_default(field),
        order,
        keyword,
        filters,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_defaults() {
        let query = list_query_from_params(&HashMap::new());

        assert_eq!(query.page, 1);
        assert_eq!(query.per_page, 10);
        assert_eq!(query.sort_by, SortField::Id);
        assert_eq!(query.order, SortOrder::Asc);
        assert!(query.keyword.is_none());
        assert!(query.filters.is_empty());
    }

    #[test]
    fn test_sort_direction_prefixes() {
        let descending = list_query_from_params(&params(&[("sort_by", "-created_at")]));
        assert_eq!(descending.sort_by, SortField::CreatedAt);
        assert_eq!(descending.order, SortOrder::Desc);

        let ascending = list_query_from_params(&params(&[("sort_by", "+username")]));
        assert_eq!(ascending.sort_by, SortField::Username);
        assert_eq!(ascending.order, SortOrder::Asc);

        let bare = list_query_from_params(&params(&[("sort_by", "username")]));
        assert_eq!(bare.sort_by, SortField::Username);
        assert_eq!(bare.order, SortOrder::Asc);
    }

    #[test]
    fn test_unknown_sort_field_falls_back_to_id() {
        let query = list_query_from_params(&params(&[("sort_by", "-password_hash")]));
        assert_eq!(query.sort_by, SortField::Id);
        assert_eq!(query.order, SortOrder::Desc);
    }

    #[test]
    fn test_invalid_pagination_falls_back() {
        let query = list_query_from_params(&params(&[("page", "zero"), ("limit", "-3")]));
        assert_eq!(query.page, 1);
        assert_eq!(query.per_page, 10);
    }

    #[test]
    fn test_filters_are_whitelisted() {
        let query = list_query_from_params(&params(&[
            ("role", "admin"),
            ("is_active", "true"),
            ("password_hash", "x"),
            ("keyword", "ali"),
        ]));

        assert_eq!(query.keyword.as_deref(), Some("ali"));
        assert_eq!(query.filters.len(), 2);
        assert!(query.filters.contains(&UserFilter::Role("admin".to_string())));
        assert!(query.filters.contains(&UserFilter::IsActive(true)));
    }
}
