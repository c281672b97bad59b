#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use spinchoice_i18n::MonthCatalog;
use spinchoice_runtime::{Duration, Instant, RepeatDirection};
use spinchoice_widgets::{MonthNameConverter, SpinEdit, SpinSignal};

#[derive(Arbitrary, Debug)]
enum Op {
    Raise,
    Lower,
    Refresh,
    Edit(String),
    SetMin(i32),
    SetMax(i32),
    SetEms(u8),
    Press(bool),
    Release(bool),
    Advance(u8),
}

#[derive(Arbitrary, Debug)]
struct Input {
    month_names: bool,
    ops: Vec<Op>,
}

fn direction(raise: bool) -> RepeatDirection {
    if raise {
        RepeatDirection::Raise
    } else {
        RepeatDirection::Lower
    }
}

fuzz_target!(|input: Input| {
    let mut field = SpinEdit::new();
    if input.month_names {
        if let Some(names) = MonthCatalog::with_builtin().get("de").cloned() {
            field.set_converter(std::rc::Rc::new(MonthNameConverter::new(names)));
        }
    }
    let mut now = Instant::now();

    for op in input.ops.into_iter().take(256) {
        match op {
            Op::Raise => {
                field.handle(SpinSignal::Raise);
            }
            Op::Lower => {
                field.handle(SpinSignal::Lower);
            }
            Op::Refresh => {
                field.handle(SpinSignal::Refresh);
            }
            Op::Edit(text) => {
                field.handle(SpinSignal::Edit(&text));
            }
            Op::SetMin(min) => field.set_min(min),
            Op::SetMax(max) => field.set_max(max),
            Op::SetEms(ems) => field.set_ems(u32::from(ems % 12)),
            Op::Press(raise) => {
                field.press(direction(raise), now);
            }
            Op::Release(raise) => field.release(direction(raise)),
            Op::Advance(ms) => {
                now += Duration::from_millis(u64::from(ms));
                field.poll_repeat(now);
            }
        }

        assert!(field.min() <= field.max());
        assert!(field.min() <= field.value() && field.value() <= field.max());
        assert_eq!(field.can_raise(), field.value() < field.max());
        assert_eq!(field.can_lower(), field.value() > field.min());
    }
});
