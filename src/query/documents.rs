//! GraphQL documents used by the storefront pages.

use crate::query::descriptor::{CachePolicy, QueryDescriptor};

pub const STORE_CONFIG_DOCUMENT: &str = r#"query StoreConfig {
  storeConfig {
    __typename
    store_code
    store_name
    locale
    base_currency_code
    default_display_currency_code
    root_category_uid
    cms_home_page
    default_title
    title_prefix
    title_suffix
    secure_base_link_url
  }
}"#;

pub const LAYOUT_DOCUMENT: &str = r#"query Layout {
  menu: categories(filters: { parent_category_uid: { eq: "Mg==" } }) {
    __typename
    items {
      __typename
      uid
      name
      url_path
      include_in_menu
      children {
        __typename
        uid
        name
        url_path
        include_in_menu
      }
    }
  }
  footer: cmsBlocks(identifiers: ["footer_links"]) {
    __typename
    items {
      __typename
      identifier
      title
      content
    }
  }
}"#;

pub const CMS_PAGE_DOCUMENT: &str = r#"query CmsPage($identifier: String!) {
  cmsPage(identifier: $identifier) {
    __typename
    identifier
    title
    content
    meta_title
    meta_description
  }
}"#;

/// Store-wide configuration, shared across pages.
pub fn store_config() -> QueryDescriptor {
    QueryDescriptor::new("StoreConfig", STORE_CONFIG_DOCUMENT).selects("storeConfig")
}

/// Navigation menu and footer blocks for the page layout.
pub fn layout() -> QueryDescriptor {
    QueryDescriptor::new("Layout", LAYOUT_DOCUMENT)
        .with_policy(CachePolicy::CacheFirst)
        .selects("menu")
        .selects("footer")
}

/// CMS page by identifier; a `null` page means the page does not exist.
pub fn cms_page(identifier: &str) -> QueryDescriptor {
    QueryDescriptor::new("CmsPage", CMS_PAGE_DOCUMENT)
        .with_variable("identifier", identifier)
        .with_policy(CachePolicy::CacheFirst)
        .require_present("cmsPage")
}
