use quickadd::cache::{CacheItem, MAX_RESULTS, ReferenceCache};
use quickadd::model::RefKind;

fn items(titles: &[&str]) -> Vec<CacheItem> {
    titles
        .iter()
        .enumerate()
        .map(|(i, t)| CacheItem::new(i.to_string(), *t))
        .collect()
}

#[test]
fn test_empty_query_returns_first_items_in_storage_order() {
    let mut cache = ReferenceCache::new();
    cache.set_projects(items(&[
        "Zeta", "Alpha", "Mid", "Beta", "Errands", "Home", "Work", "Garden", "Overflow", "Extra",
    ]));

    let found = cache.search_projects("");
    assert_eq!(found.len(), MAX_RESULTS);
    let titles: Vec<&str> = found.iter().map(|i| i.title.as_str()).collect();
    assert_eq!(
        titles,
        vec!["Zeta", "Alpha", "Mid", "Beta", "Errands", "Home", "Work", "Garden"]
    );
}

#[test]
fn test_search_is_case_insensitive_substring() {
    let mut cache = ReferenceCache::new();
    cache.set_projects(items(&["Errands", "Work", "Ferry trip"]));

    let found = cache.search_projects("ERR");
    let titles: Vec<&str> = found.iter().map(|i| i.title.as_str()).collect();
    assert_eq!(titles, vec!["Errands", "Ferry trip"]);

    assert!(cache.search_projects("xyz").is_empty());
}

#[test]
fn test_results_are_capped() {
    let mut cache = ReferenceCache::new();
    let many: Vec<String> = (0..20).map(|i| format!("label-{}", i)).collect();
    let refs: Vec<&str> = many.iter().map(String::as_str).collect();
    cache.set_labels(items(&refs));

    assert_eq!(cache.search_labels("label").len(), MAX_RESULTS);
    assert_eq!(cache.search_labels("label-1").len(), MAX_RESULTS);
    assert_eq!(cache.search_labels("label-19").len(), 1);
}

#[test]
fn test_lists_are_replaced_wholesale_and_independent() {
    let mut cache = ReferenceCache::new();
    cache.set_projects(items(&["Old one", "Old two"]));
    cache.set_projects(items(&["New"]));
    assert_eq!(cache.projects().len(), 1);
    assert!(cache.search_projects("Old").is_empty());

    assert!(cache.labels().is_empty());
    assert!(cache.search(RefKind::Label, "").is_empty());
    assert_eq!(cache.search(RefKind::Project, "new").len(), 1);
}

#[test]
fn test_from_json() {
    let cache = ReferenceCache::from_json(
        r#"{
            "projects": [{ "id": "1", "title": "Groceries" }],
            "labels": [{ "id": "9", "title": "errand" }, { "id": "10", "title": "phone" }]
        }"#,
    )
    .unwrap();
    assert_eq!(cache.projects()[0], CacheItem::new("1", "Groceries"));
    assert_eq!(cache.labels().len(), 2);

    let only_labels = ReferenceCache::from_json(r#"{ "labels": [] }"#).unwrap();
    assert!(only_labels.projects().is_empty());

    assert!(ReferenceCache::from_json("not json").is_err());
}
