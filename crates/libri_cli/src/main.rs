//! CLI smoke entry point.
//!
//! Verifies `libri_core` linkage and walks one book through the cache engine
//! against the in-memory backend. Output is deterministic.

use libri_core::{Book, BookInfo, Context, Role, TypedId};
use std::process::ExitCode;

fn main() -> ExitCode {
    println!("libri_core ping={}", libri_core::ping());
    println!("libri_core version={}", libri_core::core_version());

    let context = Context::in_memory();
    let id = TypedId::deterministic_fake(1, "Role.Book");
    let info = BookInfo::new(&id, "The Name of the Rose", "Umberto Eco", "Abbey mystery");

    let book = match Book::create(info, &context) {
        Ok(book) => book,
        Err(err) => {
            eprintln!("create failed: {err}");
            return ExitCode::FAILURE;
        }
    };
    println!("book id={}", book.id());

    match book.rename("Il nome della rosa") {
        Ok(updated) => println!("book title={}", updated.title()),
        Err(err) => {
            eprintln!("rename failed: {err}");
            return ExitCode::FAILURE;
        }
    }

    let reloaded = Book::new(&id, &context);
    println!("book serialized(before fetch)={}", reloaded.to_serialized());
    match reloaded.refresh_info() {
        Ok(info) => println!("book refreshed title={}", info.title()),
        Err(err) => {
            eprintln!("refresh failed: {err}");
            return ExitCode::FAILURE;
        }
    }

    ExitCode::SUCCESS
}
