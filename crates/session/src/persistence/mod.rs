//! Query-string persistence of the document and its source URL.
//!
//! The session mirrors two parameters into the page location: `code` holds
//! the document text and `url` the URL it was loaded from. Every change
//! replaces the current history entry through a [`HistorySink`]; nothing ever
//! pushes a new entry.

use url::form_urlencoded;

/// Parameter holding the document text.
pub const CODE_PARAM: &str = "code";
/// Parameter holding the source URL.
pub const URL_PARAM: &str = "url";

/// Receiver of history replacements.
pub trait HistorySink: Send {
	/// Replaces the current history entry's query string.
	fn replace(&mut self, query: &str);
}

/// [`HistorySink`] that keeps the latest query string in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryHistory {
	current: String,
	replacements: usize,
}

impl MemoryHistory {
	/// Returns the latest query string.
	pub fn current(&self) -> &str {
		&self.current
	}

	/// Returns how many replacements have happened.
	pub fn replacements(&self) -> usize {
		self.replacements
	}
}

impl HistorySink for MemoryHistory {
	fn replace(&mut self, query: &str) {
		self.current = query.to_string();
		self.replacements += 1;
	}
}

/// Ordered query parameters, preserving keys the session does not own.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
	pairs: Vec<(String, String)>,
}

impl QueryParams {
	/// Parses a query string, with or without the leading `?`.
	pub fn parse(query: &str) -> Self {
		let query = query.strip_prefix('?').unwrap_or(query);
		Self {
			pairs: form_urlencoded::parse(query.as_bytes()).into_owned().collect(),
		}
	}

	/// Returns the first value for `key`.
	pub fn get(&self, key: &str) -> Option<&str> {
		self.pairs.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
	}

	/// Returns true if `key` is present.
	pub fn has(&self, key: &str) -> bool {
		self.pairs.iter().any(|(k, _)| k == key)
	}

	/// Sets `key`, replacing the first occurrence and dropping the rest.
	pub fn set(&mut self, key: &str, value: &str) {
		match self.pairs.iter().position(|(k, _)| k == key) {
			Some(first) => {
				self.pairs[first].1 = value.to_string();
				let mut index = 0;
				self.pairs.retain(|(k, _)| {
					let keep = k != key || index == first;
					index += 1;
					keep
				});
			}
			None => self.pairs.push((key.to_string(), value.to_string())),
		}
	}

	/// Removes every occurrence of `key`.
	pub fn delete(&mut self, key: &str) {
		self.pairs.retain(|(k, _)| k != key);
	}

	/// Serializes to `?k=v&...`, or `?` when empty.
	pub fn to_query_string(&self) -> String {
		let mut serializer = form_urlencoded::Serializer::new(String::from("?"));
		serializer.extend_pairs(self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str())));
		serializer.finish()
	}
}

/// Persistence collaborator: owns the parameters and replaces history on change.
pub struct Persistence {
	params: QueryParams,
	history: Box<dyn HistorySink>,
}

impl std::fmt::Debug for Persistence {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Persistence").field("params", &self.params).finish_non_exhaustive()
	}
}

impl Persistence {
	/// Creates a persistence surface from the page's initial query string.
	pub fn new(initial_query: &str, history: Box<dyn HistorySink>) -> Self {
		Self {
			params: QueryParams::parse(initial_query),
			history,
		}
	}

	/// Returns the current parameters.
	pub fn params(&self) -> &QueryParams {
		&self.params
	}

	/// Stores the document text.
	pub fn store_code(&mut self, text: &str) {
		self.params.set(CODE_PARAM, text);
		self.flush();
	}

	/// Stores the source URL.
	pub fn store_url(&mut self, url: &str) {
		self.params.set(URL_PARAM, url);
		self.flush();
	}

	/// Forgets the source URL so the next startup does not reload it.
	pub fn clear_url(&mut self) {
		self.params.delete(URL_PARAM);
		self.flush();
	}

	/// Returns the serialized query string.
	pub fn query_string(&self) -> String {
		self.params.to_query_string()
	}

	fn flush(&mut self) {
		let query = self.params.to_query_string();
		self.history.replace(&query);
	}
}

/// Document state derived from the initial query string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartupDocument {
	/// Initial document text.
	pub content: String,
	/// URL to load on the first render pass.
	pub initial_url: Option<String>,
}

impl StartupDocument {
	/// Resolves the initial document.
	///
	/// A `code` parameter wins. Otherwise a `url` parameter yields a loading
	/// placeholder, and with neither the default content is used. A non-empty
	/// `url` parameter is always scheduled for loading.
	pub fn resolve(params: &QueryParams, default_content: &str) -> Self {
		let initial_url = params.get(URL_PARAM).filter(|url| !url.is_empty()).map(str::to_string);
		let content = match (params.get(CODE_PARAM), initial_url.as_deref()) {
			(Some(code), _) => code.to_string(),
			(None, Some(url)) => format!("-- loading from {url}"),
			(None, None) => default_content.to_string(),
		};
		Self { content, initial_url }
	}
}

#[cfg(test)]
mod tests;
