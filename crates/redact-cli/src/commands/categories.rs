use anyhow::Result;
use redact_core::{CategoryTable, Degree};
use serde::Serialize;

#[derive(Serialize)]
struct DegreeRow {
    degree: Degree,
    level: u8,
    introduces: &'static [&'static str],
    redacts: usize,
}

pub fn handle(json: bool) -> Result<()> {
    let table = CategoryTable::standard();
    let rows: Vec<DegreeRow> = Degree::ALL
        .into_iter()
        .map(|degree| DegreeRow {
            degree,
            level: degree.level(),
            introduces: table.tier(degree),
            redacts: table.allowlist(degree).len(),
        })
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    for row in rows {
        println!("Degree {}: {} categories", row.degree, row.redacts);
        println!("  Adds: {}", row.introduces.join(", "));
    }

    Ok(())
}
