//! Categories command - show the suggested category lists

use anyhow::Result;
use colored::Colorize;
use serde_json::json;
use wenli_core::TransactionType;

use crate::output;

pub fn run(kind: Option<String>, json: bool) -> Result<()> {
    let kinds = match kind {
        Some(k) => vec![k.parse::<TransactionType>()?],
        None => vec![TransactionType::Expense, TransactionType::Income],
    };

    if json {
        let lists: serde_json::Map<String, serde_json::Value> = kinds
            .iter()
            .map(|k| (k.as_str().to_string(), json!(k.categories())))
            .collect();
        return output::print_json(lists);
    }

    for k in kinds {
        println!("{}", k.as_str().bold());
        let mut table = output::create_table();
        table.set_header(vec!["Name", "English"]);
        for c in k.categories() {
            table.add_row(vec![c.name, c.english]);
        }
        println!("{}", table);
    }
    Ok(())
}
