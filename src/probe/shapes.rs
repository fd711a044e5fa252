//! Console proxy API shapes.
//!
//! The console never exposes the search engine directly; it forwards
//! requests through `api/console/proxy`. The parameters of that endpoint
//! changed between releases, so each known layout is described here and
//! tried in order until one answers.

use serde_json::Value;

use crate::models::CollectionDescriptor;
use crate::transport::{Method, Reply};

/// One release family's proxy endpoint layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ApiShape {
    /// Name used in logs
    pub name: &'static str,
    /// Method the proxy expects; newer releases require POST even for reads
    pub method: Method,
    collections_path: &'static str,
    /// `{INDEX}` and `{N}` are substituted
    search_template: &'static str,
}

/// Proxy layout of 5.6 and later (verified up to 7.x).
pub const V7_SHAPE: ApiShape = ApiShape {
    name: "v7",
    method: Method::Post,
    collections_path: "api/console/proxy?path=%2F_cat%2Findices%3Fformat%3Djson&method=GET",
    search_template:
        "api/console/proxy?path=%2F{INDEX}%2F_search%3Fformat%3Djson%26size%3D{N}&method=GET",
};

/// Proxy layout of early 5.x releases.
pub const V5_SHAPE: ApiShape = ApiShape {
    name: "v5",
    method: Method::Get,
    collections_path: "api/console/proxy?uri=_cat%2Findices%3Fformat%3Djson",
    search_template: "api/console/proxy?uri={INDEX}%2F_search%3Fformat%3Djson%26size%3D{N}",
};

/// Negotiation order.
pub const CONSOLE_SHAPES: &[ApiShape] = &[V7_SHAPE, V5_SHAPE];

impl ApiShape {
    /// Endpoint listing every collection.
    pub fn collections_endpoint(&self, base: &str) -> String {
        format!("{}/{}", base, self.collections_path)
    }

    /// Endpoint sampling `size` documents from `collection`.
    ///
    /// The collection name ends up inside a query parameter, so it is
    /// percent-encoded.
    pub fn search_endpoint(&self, base: &str, collection: &str, size: usize) -> String {
        let encoded: String = url::form_urlencoded::byte_serialize(collection.as_bytes()).collect();
        let path = self
            .search_template
            .replace("{INDEX}", &encoded)
            .replace("{N}", &size.to_string());
        format!("{}/{}", base, path)
    }
}

/// What a reply must look like for a shape to count as working.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpectedShape {
    /// A JSON array (the `_cat/indices` listing)
    CollectionList,
    /// A JSON object (a `_search` response)
    SearchObject,
}

impl ExpectedShape {
    /// Returns the parsed body when the reply is a 200 of the expected shape.
    pub fn accept(&self, reply: &Reply) -> Option<Value> {
        if reply.status != 200 || reply.body.trim().is_empty() {
            return None;
        }
        let value: Value = serde_json::from_str(&reply.body).ok()?;
        let matches = match self {
            ExpectedShape::CollectionList => value.is_array(),
            ExpectedShape::SearchObject => value.is_object(),
        };
        matches.then_some(value)
    }
}

/// Parses an accepted collection listing.
pub fn parse_collections(value: Value) -> Option<Vec<CollectionDescriptor>> {
    serde_json::from_value(value).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shape_order_is_newest_first() {
        assert_eq!(CONSOLE_SHAPES[0].name, "v7");
        assert_eq!(CONSOLE_SHAPES[0].method, Method::Post);
        assert_eq!(CONSOLE_SHAPES[1].name, "v5");
        assert_eq!(CONSOLE_SHAPES[1].method, Method::Get);
    }

    #[test]
    fn test_collections_endpoint() {
        assert_eq!(
            V5_SHAPE.collections_endpoint("http://1.2.3.4:5601"),
            "http://1.2.3.4:5601/api/console/proxy?uri=_cat%2Findices%3Fformat%3Djson"
        );
    }

    #[test]
    fn test_search_endpoint_substitutes_index_and_size() {
        assert_eq!(
            V7_SHAPE.search_endpoint("http://1.2.3.4:5601", "customers", 70),
            "http://1.2.3.4:5601/api/console/proxy?path=%2Fcustomers%2F_search%3Fformat%3Djson%26size%3D70&method=GET"
        );
        assert_eq!(
            V5_SHAPE.search_endpoint("http://h", "logs-2021.01", 5),
            "http://h/api/console/proxy?uri=logs-2021.01%2F_search%3Fformat%3Djson%26size%3D5"
        );
    }

    #[test]
    fn test_search_endpoint_encodes_unsafe_names() {
        let endpoint = V5_SHAPE.search_endpoint("http://h", "a&b", 1);
        assert!(endpoint.contains("uri=a%26b%2F_search"));
    }

    #[test]
    fn test_expected_shape_accept() {
        let list = Reply::new(200, r#"[{"index":"a"}]"#);
        let object = Reply::new(200, r#"{"hits":{"hits":[]}}"#);
        let not_found = Reply::new(404, r#"[{"index":"a"}]"#);
        let html = Reply::new(200, "<html></html>");

        assert!(ExpectedShape::CollectionList.accept(&list).is_some());
        assert!(ExpectedShape::CollectionList.accept(&object).is_none());
        assert!(ExpectedShape::SearchObject.accept(&object).is_some());
        assert!(ExpectedShape::SearchObject.accept(&list).is_none());
        assert!(ExpectedShape::CollectionList.accept(&not_found).is_none());
        assert!(ExpectedShape::SearchObject.accept(&html).is_none());
    }

    #[test]
    fn test_parse_collections() {
        let value = serde_json::json!([{"index": "a", "docs.count": 3}]);
        let parsed = parse_collections(value).unwrap();
        assert_eq!(parsed[0].index, "a");
        assert_eq!(parsed[0].docs_count, "3");
    }
}
