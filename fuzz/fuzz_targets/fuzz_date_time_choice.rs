#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use spinchoice_runtime::{Duration, Instant, RepeatDirection};
use spinchoice_widgets::{DateTimeChoice, DateTimeField, DateTimeValue};

#[derive(Arbitrary, Debug)]
enum Op {
    Raise(u8),
    Lower(u8),
    Edit(u8, String),
    SetValue([i16; 5]),
    Press(u8, bool),
    ReleaseAll,
    Advance(u8),
}

#[derive(Arbitrary, Debug)]
struct Input {
    min: Option<[u8; 5]>,
    span: [u8; 5],
    ops: Vec<Op>,
}

fn field(index: u8) -> DateTimeField {
    DateTimeField::ALL[usize::from(index) % DateTimeField::ALL.len()]
}

fn bound(raw: [u8; 5]) -> DateTimeValue {
    DateTimeValue::new(
        1970 + i32::from(raw[0]) % 131,
        1 + i32::from(raw[1]) % 12,
        1 + i32::from(raw[2]) % 28,
        i32::from(raw[3]) % 24,
        i32::from(raw[4]) % 60,
    )
}

fuzz_target!(|input: Input| {
    let min = input.min.map(bound);
    let max = min.map(|min| {
        let year = (min.year + i32::from(input.span[0] % 40)).min(2100);
        let candidate = DateTimeValue { year, ..bound(input.span) };
        candidate.max(min)
    });

    let mut choice = DateTimeChoice::new().with_bounds(min, max);
    let mut now = Instant::now();

    for op in input.ops.into_iter().take(256) {
        match op {
            Op::Raise(f) => {
                choice.raise(field(f));
            }
            Op::Lower(f) => {
                choice.lower(field(f));
            }
            Op::Edit(f, text) => {
                choice.edit(field(f), &text);
            }
            Op::SetValue(raw) => choice.set_value(DateTimeValue::new(
                i32::from(raw[0]),
                i32::from(raw[1]),
                i32::from(raw[2]),
                i32::from(raw[3]),
                i32::from(raw[4]),
            )),
            Op::Press(f, raise) => {
                let direction = if raise {
                    RepeatDirection::Raise
                } else {
                    RepeatDirection::Lower
                };
                choice.press(field(f), direction, now);
            }
            Op::ReleaseAll => choice.release_all(),
            Op::Advance(ms) => {
                now += Duration::from_millis(u64::from(ms));
                choice.poll_repeat(now);
            }
        }

        let value = choice.value();
        for f in DateTimeField::ALL {
            let edit = choice.field(f);
            assert!(edit.min() <= edit.value() && edit.value() <= edit.max());
        }
        if let (Some(min), Some(max)) = (min, max) {
            assert!(min <= value && value <= max, "{value} outside {min}..={max}");
        }
    }
});
