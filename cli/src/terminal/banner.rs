use colored::*;

use crate::terminal::print;

const BANNER: &str = r#"
               __
         ___  / _| __ _ _ __ ___   __ _ _ __
        / __|| |_ / _` | '_ ` _ \ / _` | '_ \
       | (__ |  _| (_| | | | | | | (_| | |_) |
        \___||_|  \__, |_| |_| |_|\__,_| .__/
                  |___/                |_|
"#;

pub fn print() {
    for line in BANNER.lines().skip(1) {
        print::print(&format!("{}", line.bright_green()));
    }
    print::centerln(&format!("{}", "configuration audit & topology mapper".bright_black()));
}
