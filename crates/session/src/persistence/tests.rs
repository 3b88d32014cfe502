use std::sync::Arc;

use parking_lot::Mutex;

use super::*;

#[derive(Clone, Default)]
struct SharedHistory(Arc<Mutex<MemoryHistory>>);

impl HistorySink for SharedHistory {
	fn replace(&mut self, query: &str) {
		self.0.lock().replace(query);
	}
}

#[test]
fn parse_decodes_and_keeps_foreign_keys() {
	let params = QueryParams::parse("?code=theorem%20t%20%3A%20true&theme=dark");
	assert_eq!(params.get(CODE_PARAM), Some("theorem t : true"));
	assert_eq!(params.get("theme"), Some("dark"));
	assert!(!params.has(URL_PARAM));
}

#[test]
fn set_replaces_in_place() {
	let mut params = QueryParams::parse("a=1&code=x&b=2&code=y");
	params.set(CODE_PARAM, "z");
	assert_eq!(params.to_query_string(), "?a=1&code=z&b=2");
}

#[test]
fn text_with_reserved_characters_round_trips() {
	let text = "example : 1 + 1 = 2 := by norm_num -- a&b=c?\n  #check ℕ";
	let mut params = QueryParams::default();
	params.set(CODE_PARAM, text);
	let reparsed = QueryParams::parse(&params.to_query_string());
	assert_eq!(reparsed.get(CODE_PARAM), Some(text));
}

#[test]
fn every_change_replaces_history() {
	let history = SharedHistory::default();
	let mut persistence = Persistence::new("", Box::new(history.clone()));

	persistence.store_code("a");
	persistence.store_url("https://example.com/a.lean");
	persistence.clear_url();

	let recorded = history.0.lock();
	assert_eq!(recorded.replacements(), 3);
	assert_eq!(recorded.current(), "?code=a");
}

#[test]
fn startup_prefers_code_parameter() {
	let params = QueryParams::parse("code=abc&url=https%3A%2F%2Fexample.com%2Fx.lean");
	let startup = StartupDocument::resolve(&params, "default");
	assert_eq!(startup.content, "abc");
	assert_eq!(startup.initial_url.as_deref(), Some("https://example.com/x.lean"));
}

#[test]
fn startup_with_only_url_shows_placeholder() {
	let params = QueryParams::parse("url=https%3A%2F%2Fexample.com%2Fx.lean");
	let startup = StartupDocument::resolve(&params, "default");
	assert_eq!(startup.content, "-- loading from https://example.com/x.lean");
}

#[test]
fn startup_without_parameters_uses_default() {
	let startup = StartupDocument::resolve(&QueryParams::parse(""), "default");
	assert_eq!(startup.content, "default");
	assert_eq!(startup.initial_url, None);
}

#[test]
fn empty_url_parameter_is_not_scheduled() {
	let startup = StartupDocument::resolve(&QueryParams::parse("url="), "default");
	assert_eq!(startup.initial_url, None);
	assert_eq!(startup.content, "default");
}
