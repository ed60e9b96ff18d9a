//! Benchmarks for editing and highlighting.

use std::fmt::Write;

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use textinput::editor::TextInput;
use textinput::highlight::TextFormat;

fn sql_document(rows: usize) -> String {
    let mut text = String::new();
    for i in 0..rows {
        let _ = writeln!(text, "select id, name from users where id = {i};");
    }
    text
}

fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

fn bench_typing_sql(c: &mut Criterion) {
    let text = sql_document(200);
    c.bench_function("typing_sql", |b| {
        b.iter(|| {
            let mut input = TextInput::new(80, 24).with_format(TextFormat::Sql);
            input.set_content(black_box(&text));
            for ch in "insert into users values (1);".chars() {
                input.handle_key(&key(KeyCode::Char(ch)));
            }
        });
    });
}

fn bench_navigation(c: &mut Criterion) {
    let text = sql_document(1_000);
    let mut input = TextInput::new(80, 24);
    input.set_content(&text);
    c.bench_function("page_through_document", |b| {
        b.iter(|| {
            for _ in 0..50 {
                input.handle_key(black_box(&key(KeyCode::PageDown)));
            }
            for _ in 0..50 {
                input.handle_key(black_box(&key(KeyCode::PageUp)));
            }
        });
    });
}

criterion_group!(benches, bench_typing_sql, bench_navigation);
criterion_main!(benches);
