use cfgmap_core::validator::registry;

use crate::mprint;
use crate::terminal::{format, print};

pub fn rules(quiet: u8) {
    let rules = registry();
    print::header("validation rules", quiet);
    print::set_key_width(rules.iter().map(|rule| rule.id()));

    for rule in &rules {
        let value = format!("{} {}", format::severity_label(rule.severity()), rule.summary());
        print::aligned_line(rule.id(), value);
    }

    if quiet == 0 {
        mprint!();
        print::end_of_program();
    }
}
