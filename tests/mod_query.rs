use bson::doc;
use foliodb::Database;
use foliodb::bookstore;
use foliodb::document::Document;
use foliodb::query::{Filter, FindOptions, Order, Projection};

fn seeded_db() -> Database {
    let db = Database::new();
    let col = db.create_collection(bookstore::COLLECTION);
    for data in bookstore::sample_books() {
        col.insert_document(Document::new(data));
    }
    db
}

#[test]
fn filter_by_genre() {
    let db = seeded_db();
    let docs = db.find(bookstore::COLLECTION, &Filter::eq("genre", "Fiction"), &FindOptions::default()).unwrap();
    assert_eq!(docs.len(), 4);
    assert!(docs.iter().all(|d| d.get_str("genre").unwrap() == "Fiction"));
}

#[test]
fn filter_by_year_range() {
    let db = seeded_db();
    let docs = db.find(bookstore::COLLECTION, &Filter::gt("published_year", 1950), &FindOptions::default()).unwrap();
    assert!(docs.iter().all(|d| d.get_i32("published_year").unwrap() > 1950));
    // 1951, 1954, 1960, 1988
    assert_eq!(docs.len(), 4);
}

#[test]
fn compound_filter_is_a_conjunction() {
    let db = seeded_db();
    let filter = Filter::And(vec![
        Filter::eq("in_stock", true),
        Filter::gt("published_year", 1950),
    ]);
    let docs = db.find(bookstore::COLLECTION, &filter, &FindOptions::default()).unwrap();
    assert!(docs.iter().all(|d| {
        d.get_bool("in_stock").unwrap() && d.get_i32("published_year").unwrap() > 1950
    }));
    assert_eq!(docs.len(), 4);
}

#[test]
fn projection_without_id_never_leaks_id() {
    let db = seeded_db();
    let opts = FindOptions::default()
        .project(Projection::without_id(&["title", "author", "price"]));
    let docs = db.find(bookstore::COLLECTION, &Filter::All, &opts).unwrap();
    assert_eq!(docs.len(), 12);
    for d in &docs {
        assert!(d.get("_id").is_none());
        assert_eq!(d.len(), 3);
        assert!(d.get("title").is_some());
        assert!(d.get("author").is_some());
        assert!(d.get("price").is_some());
    }
}

#[test]
fn default_projection_carries_id() {
    let db = seeded_db();
    let docs = db.find(bookstore::COLLECTION, &Filter::All, &FindOptions::default()).unwrap();
    assert!(docs.iter().all(|d| d.get_str("_id").is_ok()));
}

#[test]
fn sort_ascending_then_descending_reverses() {
    let db = seeded_db();
    let asc = db
        .find(
            bookstore::COLLECTION,
            &Filter::All,
            &FindOptions::default().sorted_by("price", Order::Asc),
        )
        .unwrap();
    let desc = db
        .find(
            bookstore::COLLECTION,
            &Filter::All,
            &FindOptions::default().sorted_by("price", Order::Desc),
        )
        .unwrap();
    let prices_asc: Vec<f64> = asc.iter().map(|d| d.get_f64("price").unwrap()).collect();
    let mut prices_desc: Vec<f64> = desc.iter().map(|d| d.get_f64("price").unwrap()).collect();
    prices_desc.reverse();
    assert_eq!(prices_asc, prices_desc);
    assert!(prices_asc.windows(2).all(|w| w[0] <= w[1]));
}

#[test]
fn pagination_pages_are_disjoint_and_cover_the_prefix() {
    let db = seeded_db();
    let sorted = FindOptions::default().sorted_by("title", Order::Asc);
    let page1 = db
        .find(bookstore::COLLECTION, &Filter::All, &sorted.clone().limit(5))
        .unwrap();
    let page2 = db
        .find(bookstore::COLLECTION, &Filter::All, &sorted.clone().skip(5).limit(5))
        .unwrap();
    let full = db.find(bookstore::COLLECTION, &Filter::All, &sorted).unwrap();

    let titles1: Vec<&str> = page1.iter().map(|d| d.get_str("title").unwrap()).collect();
    let titles2: Vec<&str> = page2.iter().map(|d| d.get_str("title").unwrap()).collect();
    assert_eq!(titles1.len(), 5);
    assert_eq!(titles2.len(), 5);
    assert!(titles1.iter().all(|t| !titles2.contains(t)));

    let mut union: Vec<&str> = titles1.iter().chain(titles2.iter()).copied().collect();
    union.sort_unstable();
    let mut first_ten: Vec<&str> =
        full.iter().take(10).map(|d| d.get_str("title").unwrap()).collect();
    first_ten.sort_unstable();
    assert_eq!(union, first_ten);
}

#[test]
fn skip_past_the_end_yields_nothing() {
    let db = seeded_db();
    let docs = db
        .find(bookstore::COLLECTION, &Filter::All, &FindOptions::default().skip(100).limit(5))
        .unwrap();
    assert!(docs.is_empty());
}

#[test]
fn find_on_missing_collection_is_an_error() {
    let db = Database::new();
    assert!(db.find("nowhere", &Filter::All, &FindOptions::default()).is_err());
}

#[test]
fn or_filter_matches_either_branch() {
    let db = seeded_db();
    let filter = Filter::Or(vec![
        Filter::eq("author", "George Orwell"),
        Filter::eq("author", "Jane Austen"),
    ]);
    let docs = db.find(bookstore::COLLECTION, &filter, &FindOptions::default()).unwrap();
    assert_eq!(docs.len(), 3);
}

#[test]
fn dotted_paths_reach_into_subdocuments() {
    let db = Database::new();
    let col = db.create_collection("nested");
    col.insert_document(Document::new(doc! {"meta": {"rating": 5}}));
    col.insert_document(Document::new(doc! {"meta": {"rating": 2}}));
    let docs = db.find("nested", &Filter::gte("meta.rating", 4), &FindOptions::default()).unwrap();
    assert_eq!(docs.len(), 1);
}
