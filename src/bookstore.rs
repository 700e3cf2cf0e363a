//! The fixed bookstore catalog: seventeen operations over a `books`
//! collection, plus the sample documents the demo binary seeds.

use bson::{Document as BsonDocument, doc};

use crate::aggregate::{Accumulator, Expr, Pipeline, ProjectField};
use crate::catalog::{OperationDescriptor, OperationPayload};
use crate::index::{Direction, IndexKeys};
use crate::query::{Filter, FindOptions, Order, Projection, SortSpec, UpdateDoc};

pub const COLLECTION: &str = "books";

/// The full operation list, in execution order. Ids are stable so report
/// entries can be correlated across runs.
#[must_use]
pub fn catalog() -> Vec<OperationDescriptor> {
    vec![
        OperationDescriptor::new(
            1,
            "Find all books in the Fiction genre",
            OperationPayload::Find {
                filter: Filter::eq("genre", "Fiction"),
                options: FindOptions::default(),
            },
        ),
        OperationDescriptor::new(
            2,
            "Find books published after the year 2000",
            OperationPayload::Find {
                filter: Filter::gt("published_year", 2000),
                options: FindOptions::default(),
            },
        ),
        OperationDescriptor::new(
            3,
            "Find all books by George Orwell",
            OperationPayload::Find {
                filter: Filter::eq("author", "George Orwell"),
                options: FindOptions::default(),
            },
        ),
        OperationDescriptor::new(
            4,
            "Update the price of The Great Gatsby to 12.99",
            OperationPayload::UpdateOne {
                filter: Filter::eq("title", "The Great Gatsby"),
                update: UpdateDoc::default().set("price", 12.99),
            },
        ),
        OperationDescriptor::new(
            5,
            "Delete the book with title Animal Farm",
            OperationPayload::DeleteOne { filter: Filter::eq("title", "Animal Farm") },
        ),
        OperationDescriptor::new(
            6,
            "Find books in stock and published after 2010",
            OperationPayload::Find {
                filter: Filter::And(vec![
                    Filter::eq("in_stock", true),
                    Filter::gt("published_year", 2010),
                ]),
                options: FindOptions::default(),
            },
        ),
        OperationDescriptor::new(
            7,
            "Return only title, author, and price",
            OperationPayload::Find {
                filter: Filter::All,
                options: FindOptions::default()
                    .project(Projection::without_id(&["title", "author", "price"])),
            },
        ),
        OperationDescriptor::new(
            8,
            "Sort books by price ascending",
            OperationPayload::Find {
                filter: Filter::All,
                options: FindOptions::default().sorted_by("price", Order::Asc),
            },
        ),
        OperationDescriptor::new(
            9,
            "Sort books by price descending",
            OperationPayload::Find {
                filter: Filter::All,
                options: FindOptions::default().sorted_by("price", Order::Desc),
            },
        ),
        OperationDescriptor::new(
            10,
            "Pagination page 1: first 5 books",
            OperationPayload::Find {
                filter: Filter::All,
                options: FindOptions::default().sorted_by("title", Order::Asc).limit(5),
            },
        ),
        OperationDescriptor::new(
            11,
            "Pagination page 2: next 5 books",
            OperationPayload::Find {
                filter: Filter::All,
                options: FindOptions::default().sorted_by("title", Order::Asc).skip(5).limit(5),
            },
        ),
        OperationDescriptor::new(
            12,
            "Average price of books by genre",
            OperationPayload::Aggregate {
                pipeline: Pipeline::new().group(
                    Expr::field("genre"),
                    vec![("avgPrice", Accumulator::Avg(Expr::field("price")))],
                ),
            },
        ),
        OperationDescriptor::new(
            13,
            "Author with the most books",
            OperationPayload::Aggregate {
                pipeline: Pipeline::new()
                    .group(
                        Expr::field("author"),
                        vec![("totalBooks", Accumulator::Sum(Expr::lit(1)))],
                    )
                    .sort(vec![SortSpec::new("totalBooks", Order::Desc)])
                    .limit(1),
            },
        ),
        OperationDescriptor::new(
            14,
            "Group books by publication decade and count",
            OperationPayload::Aggregate { pipeline: decade_pipeline() },
        ),
        OperationDescriptor::new(
            15,
            "Create index on the title field",
            OperationPayload::CreateIndex {
                keys: IndexKeys::single("title", Direction::Ascending),
            },
        ),
        OperationDescriptor::new(
            16,
            "Create compound index on author and published_year",
            OperationPayload::CreateIndex {
                keys: IndexKeys::compound(&[
                    ("author", Direction::Ascending),
                    ("published_year", Direction::Descending),
                ]),
            },
        ),
        OperationDescriptor::new(
            17,
            "Explain the indexed lookup of The Hobbit",
            OperationPayload::Explain {
                filter: Filter::eq("title", "The Hobbit"),
                options: FindOptions::default(),
            },
        ),
    ]
}

/// Buckets by `floor(published_year / 10)`, counts members, derives the
/// display label (`199` becomes `"1990s"`), and sorts ascending by it.
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

/// The demo dataset.
#[must_use]
pub fn sample_books() -> Vec<BsonDocument> {
    vec![
        doc! {
            "title": "To Kill a Mockingbird",
            "author": "Harper Lee",
            "genre": "Fiction",
            "published_year": 1960,
            "price": 12.99,
            "in_stock": true,
            "pages": 336,
            "publisher": "J. B. Lippincott & Co."
        },
        doc! {
            "title": "1984",
            "author": "George Orwell",
            "genre": "Dystopian",
            "published_year": 1949,
            "price": 10.99,
            "in_stock": true,
            "pages": 328,
            "publisher": "Secker & Warburg"
        },
        doc! {
            "title": "The Great Gatsby",
            "author": "F. Scott Fitzgerald",
            "genre": "Fiction",
            "published_year": 1925,
            "price": 9.99,
            "in_stock": true,
            "pages": 180,
            "publisher": "Charles Scribner's Sons"
        },
        doc! {
            "title": "Brave New World",
            "author": "Aldous Huxley",
            "genre": "Dystopian",
            "published_year": 1932,
            "price": 11.50,
            "in_stock": false,
            "pages": 311,
            "publisher": "Chatto & Windus"
        },
        doc! {
            "title": "The Hobbit",
            "author": "J.R.R. Tolkien",
            "genre": "Fantasy",
            "published_year": 1937,
            "price": 14.99,
            "in_stock": true,
            "pages": 310,
            "publisher": "George Allen & Unwin"
        },
        doc! {
            "title": "The Catcher in the Rye",
            "author": "J.D. Salinger",
            "genre": "Fiction",
            "published_year": 1951,
            "price": 8.99,
            "in_stock": true,
            "pages": 224,
            "publisher": "Little, Brown and Company"
        },
        doc! {
            "title": "Pride and Prejudice",
            "author": "Jane Austen",
            "genre": "Romance",
            "published_year": 1813,
            "price": 7.99,
            "in_stock": true,
            "pages": 432,
            "publisher": "T. Egerton, Whitehall"
        },
        doc! {
            "title": "The Lord of the Rings",
            "author": "J.R.R. Tolkien",
            "genre": "Fantasy",
            "published_year": 1954,
            "price": 19.99,
            "in_stock": true,
            "pages": 1178,
            "publisher": "Allen & Unwin"
        },
        doc! {
            "title": "Animal Farm",
            "author": "George Orwell",
            "genre": "Political Satire",
            "published_year": 1945,
            "price": 8.50,
            "in_stock": false,
            "pages": 112,
            "publisher": "Secker & Warburg"
        },
        doc! {
            "title": "The Alchemist",
            "author": "Paulo Coelho",
            "genre": "Fiction",
            "published_year": 1988,
            "price": 10.99,
            "in_stock": true,
            "pages": 197,
            "publisher": "HarperOne"
        },
        doc! {
            "title": "Moby Dick",
            "author": "Herman Melville",
            "genre": "Adventure",
            "published_year": 1851,
            "price": 12.50,
            "in_stock": false,
            "pages": 635,
            "publisher": "Harper & Brothers"
        },
        doc! {
            "title": "Wuthering Heights",
            "author": "Emily Brontë",
            "genre": "Gothic Fiction",
            "published_year": 1847,
            "price": 9.99,
            "in_stock": true,
            "pages": 342,
            "publisher": "Thomas Cautley Newby"
        },
    ]
}
