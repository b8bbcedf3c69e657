/// Query parameters of a single API call
///
/// Built fresh per call and never persisted. Every modifier is optional
/// and omitted from the query string when absent
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestSpec {
    endpoint: String,
    id: Option<u64>,
    selections: Vec<String>,
    limit: Option<u32>,
    sort: Option<String>,
    stat: Option<String>,
    cat: Option<u32>,
    log: Option<u32>,
    from: Option<i64>,
    to: Option<i64>,
    timestamp: Option<i64>
}

impl RequestSpec {
    pub fn new(endpoint: impl ToString) -> Self {
        Self {
            endpoint: endpoint.to_string(),

            ..Self::default()
        }
    }

    /// ID appended to the endpoint path
    pub fn with_id(mut self, id: u64) -> Self {
        self.id = Some(id);

        self
    }

    pub fn maybe_id(mut self, id: Option<u64>) -> Self {
        self.id = id;

        self
    }

    /// Field groups the API should return, joined by commas in the query
    pub fn with_selections<T: ToString>(mut self, selections: impl IntoIterator<Item = T>) -> Self {
        self.selections = selections.into_iter()
            .map(|selection| selection.to_string())
            .collect();

        self
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);

        self
    }

    pub fn with_sort(mut self, sort: impl ToString) -> Self {
        self.sort = Some(sort.to_string());

        self
    }

    pub fn with_stat(mut self, stat: impl ToString) -> Self {
        self.stat = Some(stat.to_string());

        self
    }

    /// Filter logs by category
    pub fn with_cat(mut self, cat: u32) -> Self {
        self.cat = Some(cat);

        self
    }

    /// Filter logs by type
    pub fn with_log(mut self, log: u32) -> Self {
        self.log = Some(log);

        self
    }

    /// UNIX timestamp to filter results, entries on or after it
    pub fn with_from(mut self, from: i64) -> Self {
        self.from = Some(from);

        self
    }

    /// UNIX timestamp to filter results, entries on or before it
    pub fn with_to(mut self, to: i64) -> Self {
        self.to = Some(to);

        self
    }

    /// UNIX timestamp to get a specific stat from a date
    pub fn with_timestamp(mut self, timestamp: i64) -> Self {
        self.timestamp = Some(timestamp);

        self
    }

    /// Request path: `/<endpoint>[/<id>]`
    pub fn path(&self) -> String {
        match self.id {
            Some(id) => format!("/{}/{id}", self.endpoint),
            None => format!("/{}", self.endpoint)
        }
    }

    /// Modifier pairs present on this spec, selections first
    fn modifiers(&self) -> Vec<(String, String)> {
        let mut params = Vec::new();

        if !self.selections.is_empty() {
            params.push((String::from("selections"), self.selections.join(",")));
        }

        let optional = [
            ("limit", self.limit.map(|limit| limit.to_string())),
            ("sort", self.sort.clone()),
            ("stat", self.stat.clone()),
            ("cat", self.cat.map(|cat| cat.to_string())),
            ("log", self.log.map(|log| log.to_string())),
            ("from", self.from.map(|from| from.to_string())),
            ("to", self.to.map(|to| to.to_string())),
            ("timestamp", self.timestamp.map(|timestamp| timestamp.to_string()))
        ];

        for (name, value) in optional {
            if let Some(value) = value {
                params.push((name.to_string(), value));
            }
        }

        params
    }

    /// Full query parameter list for this call
    ///
    /// Selections come first when present, then the API key,
    /// then every present modifier, then the optional comment
    pub fn params(&self, key: &str, comment: Option<&str>) -> Vec<(String, String)> {
        let mut params = self.modifiers();

        let key_pos = usize::from(!self.selections.is_empty());

        params.insert(key_pos, (String::from("key"), key.to_string()));

        if let Some(comment) = comment {
            params.push((String::from("comment"), comment.to_string()));
        }

        params
    }

    /// Opaque cache key: path plus modifiers, API key excluded
    /// so secrets never end up in cache keys
    pub fn cache_key(&self) -> String {
        let modifiers = self.modifiers().into_iter()
            .map(|(name, value)| format!("{name}={value}"))
            .collect::<Vec<String>>()
            .join("&");

        if modifiers.is_empty() {
            return self.path();
        }

        format!("{}?{modifiers}", self.path())
    }
}
