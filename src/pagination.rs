use axum::http::Uri;
use serde::Serialize;

const MAX_PAGE_SIZE: i64 = 100;

/// The rows a page covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub limit: i64,
    pub offset: i64,
}

impl PageWindow {
    fn end(&self) -> i64 {
        self.offset.saturating_add(self.limit)
    }

    fn has_next(&self, count: i64) -> bool {
        self.end() < count
    }
}

/// `?page=&limit=` pagination, pages counted from 1.
#[derive(Debug, Default, Clone, Copy)]
pub struct PageNumber {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

impl PageNumber {
    pub fn window(&self, default_limit: i64) -> PageWindow {
        let limit = clamp_limit(self.limit, default_limit);
        let page = self.page.unwrap_or(1).max(1);
        PageWindow {
            limit,
            offset: (page - 1).saturating_mul(limit),
        }
    }
}

/// `?limit=&offset=` pagination.
#[derive(Debug, Default, Clone, Copy, serde::Deserialize)]
pub struct LimitOffset {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl LimitOffset {
    pub fn window(&self, default_limit: i64) -> PageWindow {
        PageWindow {
            limit: clamp_limit(self.limit, default_limit),
            offset: self.offset.unwrap_or(0).max(0),
        }
    }
}

fn clamp_limit(limit: Option<i64>, default_limit: i64) -> i64 {
    limit.unwrap_or(default_limit).clamp(1, MAX_PAGE_SIZE)
}

#[derive(Debug, Serialize)]
pub struct Paginated<T> {
    pub count: i64,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub results: Vec<T>,
}

impl<T> Paginated<T> {
    /// Links keep every other query parameter of `uri` and rewrite `page`.
    pub fn by_page_number(
        results: Vec<T>,
        count: i64,
        window: PageWindow,
        base_url: &str,
        uri: &Uri,
    ) -> Self {
        let page = window.offset / window.limit + 1;
        let link = |page: i64| {
            link_with(base_url, uri, &[("page", page), ("limit", window.limit)])
        };
        Self {
            count,
            next: window.has_next(count).then(|| link(page.saturating_add(1))),
            previous: (page > 1).then(|| link(page - 1)),
            results,
        }
    }

    /// Links keep every other query parameter of `uri` and rewrite `offset`.
    pub fn by_limit_offset(
        results: Vec<T>,
        count: i64,
        window: PageWindow,
        base_url: &str,
        uri: &Uri,
    ) -> Self {
        let link = |offset: i64| {
            link_with(base_url, uri, &[("limit", window.limit), ("offset", offset)])
        };
        Self {
            count,
            next: window.has_next(count).then(|| link(window.end())),
            previous: (window.offset > 0)
                .then(|| link(window.offset.saturating_sub(window.limit).max(0))),
            results,
        }
    }
}

fn link_with(base_url: &str, uri: &Uri, replaced: &[(&str, i64)]) -> String {
    let mut pairs: Vec<(String, String)> =
        serde_urlencoded::from_str(uri.query().unwrap_or_default()).unwrap_or_default();
    pairs.retain(|(key, _)| !replaced.iter().any(|(name, _)| name == key));
    pairs.extend(
        replaced
            .iter()
            .map(|(name, value)| (name.to_string(), value.to_string())),
    );
    let query = serde_urlencoded::to_string(&pairs).unwrap_or_default();
    format!(
        "{}{}?{}",
        base_url.trim_end_matches('/'),
        uri.path(),
        query
    )
}
