//! Benchmarks for multi-selection dispatch
//!
//! Run with: cargo bench dispatch

use multicaret::clipboard::MemoryClipboard;
use multicaret::command::Command;
use multicaret::dispatch::Dispatcher;
use multicaret::editable::{EditableView, UndoJournal};
use multicaret::host::NoopRenderer;

#[global_allocator]
static ALLOC: divan::AllocProfiler = divan::AllocProfiler::system();

fn main() {
    divan::main();
}

type BenchDispatcher = Dispatcher<EditableView, MemoryClipboard, UndoJournal, NoopRenderer>;

/// One caret at the start of each of the first `carets` lines
fn dispatcher_with_carets(carets: usize) -> BenchDispatcher {
    let text = "let value = compute(input);\n".repeat(carets.max(1) * 2);
    let clipboard = MemoryClipboard::new();
    let journal = UndoJournal::new();
    let view = EditableView::with_collaborators(&text, clipboard.clone(), journal.clone());
    let mut d = Dispatcher::new(view, clipboard, journal, NoopRenderer);

    let line_len = "let value = compute(input);\n".chars().count();
    for line in 0..carets {
        d.view_mut().set_caret(line * line_len);
        d.add_current_caret();
    }
    d
}

// ============================================================================
// Generic replay
// ============================================================================

#[divan::bench(args = [10, 100, 1_000])]
fn type_char(bencher: divan::Bencher, carets: usize) {
    bencher
        .with_inputs(|| dispatcher_with_carets(carets))
        .bench_local_values(|mut d| {
            d.dispatch(divan::black_box(&Command::InsertChar('x')));
            d
        });
}

#[divan::bench(args = [10, 100, 1_000])]
fn type_word(bencher: divan::Bencher, carets: usize) {
    bencher
        .with_inputs(|| dispatcher_with_carets(carets))
        .bench_local_values(|mut d| {
            for ch in "result".chars() {
                d.dispatch(&Command::InsertChar(ch));
            }
            d
        });
}

// ============================================================================
// Selection-changing commands
// ============================================================================

#[divan::bench(args = [10, 100, 1_000])]
fn extend_word_right(bencher: divan::Bencher, carets: usize) {
    bencher
        .with_inputs(|| dispatcher_with_carets(carets))
        .bench_local_values(|mut d| {
            d.dispatch(&Command::MoveCursorWordRightWithSelection);
            d
        });
}

#[divan::bench(args = [10, 100, 1_000])]
fn copy_then_paste(bencher: divan::Bencher, carets: usize) {
    bencher
        .with_inputs(|| {
            let mut d = dispatcher_with_carets(carets);
            d.dispatch(&Command::MoveCursorWordRightWithSelection);
            d
        })
        .bench_local_values(|mut d| {
            d.dispatch(&Command::Copy);
            d.dispatch(&Command::MoveCursorRight);
            d.dispatch(&Command::Paste);
            d
        });
}

#[divan::bench(args = [10, 100, 1_000])]
fn collapse_merging_carets(bencher: divan::Bencher, carets: usize) {
    bencher
        .with_inputs(|| dispatcher_with_carets(carets))
        .bench_local_values(|mut d| {
            d.dispatch(&Command::MoveCursorDocumentStart);
            d
        });
}
