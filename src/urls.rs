use url::Url;

/// Convenience wrapper for URL generation functions.
#[derive(Clone)]
pub struct Urls {
    /// Top-level URL, including trailing slash.
    base: Url,

    /// Path for all location-related actions.
    pub(crate) locations_path: String,

    /// Prefix for all location-related actions.
    locations_prefix: String,
}

impl Urls {
    /// Create a new instance. `locations_path` should *not* include a
    /// trailing slash.
    pub fn new(base: impl AsRef<str>, locations_path: impl Into<String>) -> Self {
        let base =
            Url::parse(base.as_ref()).unwrap_or_else(|_| panic!("parse {} as URL", base.as_ref()));
        let locations_path = locations_path.into();
        let locations_prefix = format!("{}/", locations_path);

        Urls {
            base,
            locations_path,
            locations_prefix,
        }
    }

    pub fn locations(&self) -> Url {
        self.base
            .join(&self.locations_prefix)
            .expect("get locations URL")
    }

    /// The URL at which the location with reference `id` can be retrieved.
    pub fn location(&self, id: &str) -> Url {
        let mut url = self.locations();

        // push rather than join so that references are always escaped
        url.path_segments_mut()
            .expect("base URL can have path segments")
            .pop_if_empty()
            .extend(&["id", id]);

        url
    }
}
