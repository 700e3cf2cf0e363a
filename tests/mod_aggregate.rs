use bson::doc;
use foliodb::Database;
use foliodb::aggregate::{Accumulator, Expr, Pipeline, ProjectField};
use foliodb::document::Document;
use foliodb::query::{Order, SortSpec};

fn decade_pipeline() -> Pipeline {
    Pipeline::new()
        .group(
            Expr::floor(Expr::divide(Expr::field("published_year"), Expr::lit(10))),
            vec![("count", Accumulator::Sum(Expr::lit(1)))],
        )
        .project(vec![
            (
                "decade",
                ProjectField::Computed(Expr::concat(vec![
                    Expr::stringify(Expr::multiply(Expr::field("_id"), Expr::lit(10))),
                    Expr::lit("s"),
                ])),
            ),
            ("count", ProjectField::Include),
            ("_id", ProjectField::Exclude),
        ])
        .sort(vec![SortSpec::new("decade", Order::Asc)])
}

#[test]
fn decade_buckets_count_and_label() {
    let db = Database::new();
    let col = db.create_collection("books");
    for year in [1994, 1998, 2003] {
        col.insert_document(Document::new(doc! {"published_year": year}));
    }
    let out = db.aggregate("books", &decade_pipeline()).unwrap();
    assert_eq!(out.len(), 2);
    assert_eq!(out[0], doc! {"decade": "1990s", "count": 2_i64});
    assert_eq!(out[1], doc! {"decade": "2000s", "count": 1_i64});
}

#[test]
fn author_with_most_books_wins_alone() {
    let db = Database::new();
    let col = db.create_collection("books");
    for _ in 0..3 {
        col.insert_document(Document::new(doc! {"author": "A"}));
    }
    for _ in 0..5 {
        col.insert_document(Document::new(doc! {"author": "B"}));
    }
    let pipeline = Pipeline::new()
        .group(Expr::field("author"), vec![("totalBooks", Accumulator::Sum(Expr::lit(1)))])
        .sort(vec![SortSpec::new("totalBooks", Order::Desc)])
        .limit(1);
    let out = db.aggregate("books", &pipeline).unwrap();
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].get_str("_id").unwrap(), "B");
    assert_eq!(out[0].get_i64("totalBooks").unwrap(), 5);
}

#[test]
fn average_price_by_genre() {
    let db = Database::new();
    let col = db.create_collection("books");
    col.insert_document(Document::new(doc! {"genre": "Fiction", "price": 8.0}));
    col.insert_document(Document::new(doc! {"genre": "Fiction", "price": 12.0}));
    col.insert_document(Document::new(doc! {"genre": "Fantasy", "price": 15.0}));
    let pipeline = Pipeline::new()
        .group(Expr::field("genre"), vec![("avgPrice", Accumulator::Avg(Expr::field("price")))])
        .sort(vec![SortSpec::new("_id", Order::Asc)]);
    let out = db.aggregate("books", &pipeline).unwrap();
    assert_eq!(out.len(), 2);
    assert_eq!(out[0].get_str("_id").unwrap(), "Fantasy");
    assert_eq!(out[0].get_f64("avgPrice").unwrap(), 15.0);
    assert_eq!(out[1].get_str("_id").unwrap(), "Fiction");
    assert_eq!(out[1].get_f64("avgPrice").unwrap(), 10.0);
}

#[test]
fn pipeline_output_follows_stage_order() {
    // limit before group sees raw documents; after group it sees buckets
    let db = Database::new();
    let col = db.create_collection("books");
    for i in 0..4 {
        col.insert_document(Document::new(doc! {"g": if i % 2 == 0 { "even" } else { "odd" }}));
    }
    let grouped_then_limited = Pipeline::new()
        .group(Expr::field("g"), vec![("n", Accumulator::Sum(Expr::lit(1)))])
        .limit(1);
    let out = db.aggregate("books", &grouped_then_limited).unwrap();
    assert_eq!(out.len(), 1);

    let limited_then_grouped = Pipeline::new()
        .limit(1)
        .group(Expr::field("g"), vec![("n", Accumulator::Sum(Expr::lit(1)))]);
    let out = db.aggregate("books", &limited_then_grouped).unwrap();
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].get_i64("n").unwrap(), 1);
}

#[test]
fn avg_over_missing_fields_is_null() {
    let db = Database::new();
    let col = db.create_collection("books");
    col.insert_document(Document::new(doc! {"genre": "Fiction"}));
    let pipeline = Pipeline::new()
        .group(Expr::field("genre"), vec![("avgPrice", Accumulator::Avg(Expr::field("price")))]);
    let out = db.aggregate("books", &pipeline).unwrap();
    assert!(matches!(out[0].get("avgPrice"), Some(bson::Bson::Null)));
}
