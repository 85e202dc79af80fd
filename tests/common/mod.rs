#![allow(dead_code)]

use std::io::Write;

pub const EXAMPLE_INI: &str = include_str!("../../harness.ini.example");

pub const FULL_INI: &str = r#"
# Every documented key, explicitly set.

[runtests]
xre_path = /builds/xre/bin
utility_path = /builds/host/bin
minidump_stackwalk = /builds/tools/minidump_stackwalk
androidprocname = org.mozilla.fennec
console_level = WARN
file_level = DEBUG
time_out = 2400

[autolog]
es_server = es.example.org:9200
rest_server = https://results.example.org/api/
index = autophone-nightly
include_pass = True
submit_log = True
use_newparser = True
"#;

pub fn write_temp_ini(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

/// `content` with every line starting with `key` removed.
pub fn without_key(content: &str, key: &str) -> String {
    content
        .lines()
        .filter(|line| !line.trim_start().starts_with(key))
        .map(|line| format!("{line}\n"))
        .collect()
}
