use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use super::error::Result;
use super::rule::AssociationRule;

/// One rule per line: `1 2 ==> 3 #SUP: 4 #CONF: 0.8`.
pub fn format_rules(rules: &[AssociationRule]) -> String {
    let mut out = String::new();
    for rule in rules {
        out.push_str(&rule.to_string());
        out.push('\n');
    }
    out
}

pub fn write_rules(path: impl AsRef<Path>, rules: &[AssociationRule]) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    for rule in rules {
        writeln!(writer, "{}", rule)?;
    }
    writer.flush()?;
    Ok(())
}
