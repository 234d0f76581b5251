use crate::{OutputMode, emit_success};
use anyhow::Context;
use owo_colors::OwoColorize;
use risi::config::{self, RisiConfig};
use risi::contract::{COLUMN_BREED, COLUMN_NAME, COLUMN_PACKAGING, COLUMN_PRICE};
use risi::ui::{self, Icons, banner, format_price, section, success, warn};
use risi::{FieldMap, FieldValue, Packaging, RiceAddress, RiceStore, Selection};
use std::path::Path;

/// Build a field map from CLI flags; absent flags stay absent.
///
/// Names and breeds are trimmed and an empty breed is stored as null.
/// Packaging accepts a label or a code and anything else is passed through
/// so the store reports it as invalid.
pub fn fields_from_args(
    name: Option<String>,
    breed: Option<String>,
    packaging: Option<String>,
    price: Option<String>,
) -> FieldMap {
    let mut fields = FieldMap::new();
    if let Some(name) = name {
        fields.put(COLUMN_NAME, name.trim());
    }
    if let Some(breed) = breed {
        let breed = breed.trim();
        let value = if breed.is_empty() { FieldValue::Null } else { FieldValue::from(breed) };
        fields.put(COLUMN_BREED, value);
    }
    if let Some(packaging) = packaging {
        let value = packaging
            .parse::<Packaging>()
            .map(FieldValue::from)
            .unwrap_or_else(|_| FieldValue::from(packaging));
        fields.put(COLUMN_PACKAGING, value);
    }
    if let Some(price) = price {
        fields.put(COLUMN_PRICE, price.trim());
    }
    fields
}

fn selection_from_args(filter: Option<String>, args: Vec<String>) -> Selection {
    let mut selection = filter.map(Selection::new).unwrap_or_default();
    selection.args = args.into_iter().map(FieldValue::from).collect();
    selection
}

pub fn run_init(
    output_mode: OutputMode,
    config_path: &Path,
    settings: &RisiConfig,
    force: bool,
    store: RiceStore,
) -> anyhow::Result<()> {
    config::write_config(config_path, settings, force)?;
    store.close()?;

    if output_mode.is_human() {
        success(&format!("Wrote {}", config_path.display()));
        ui::info("Database", settings.database.as_deref().unwrap_or_default());
    } else {
        emit_success(output_mode, "init", serde_json::json!({
            "config": config_path.display().to_string(),
            "database": settings.database,
        }))?;
    }
    Ok(())
}

pub fn run_list(
    output_mode: OutputMode,
    store: &RiceStore,
    filter: Option<String>,
    args: Vec<String>,
    sort: Option<&str>,
    columns: &[String],
) -> anyhow::Result<()> {
    let selection = selection_from_args(filter, args);
    let projection: Vec<&str> = columns.iter().map(|c| c.trim()).collect();
    let projection = (!projection.is_empty()).then_some(projection.as_slice());

    let cursor = store.query(&RiceAddress::Collection, projection, &selection, sort)?;

    if output_mode.is_human() {
        if cursor.is_empty() {
            println!("{} No rices found.", Icons::EMPTY);
        } else {
            let table = match projection {
                None => ui::rice_table(&cursor.to_items()?),
                Some(_) => ui::cursor_table(&cursor),
            };
            println!("{}", table);
            println!("{} {} rice(s)", Icons::RICE, cursor.len());
        }
    } else {
        emit_success(output_mode, "list", serde_json::json!({
            "type": store.mime_type(&RiceAddress::Collection),
            "cursor": cursor,
        }))?;
    }
    Ok(())
}

pub fn run_show(output_mode: OutputMode, store: &RiceStore, id: i64) -> anyhow::Result<()> {
    let address = RiceAddress::item(id);
    let item = store.query(&address, None, &Selection::all(), None)?.first_item()?;

    if output_mode.is_human() {
        match item {
            Some(item) => {
                section(&item.name);
                ui::summary_row("ID", &item.id.to_string());
                ui::summary_row("Breed", item.breed.as_deref().unwrap_or("-"));
                ui::summary_row("Packaging", item.packaging.as_str());
                ui::summary_row(
                    "Price",
                    &format_price(item.price).style(ui::theme().price.clone()).to_string(),
                );
            }
            None => anyhow::bail!("No rice at {}", address),
        }
    } else {
        emit_success(output_mode, "show", serde_json::json!({
            "type": store.mime_type(&address),
            "rice": item,
        }))?;
    }
    Ok(())
}

pub fn run_add(output_mode: OutputMode, store: &RiceStore, fields: &FieldMap) -> anyhow::Result<()> {
    let id = store
        .insert(&RiceAddress::Collection, fields)
        .context("Error with saving rice")?;

    if output_mode.is_human() {
        success("Rice saved");
        ui::info("Address", &RiceAddress::item(id).to_string());
    } else {
        emit_success(output_mode, "add", serde_json::json!({
            "id": id,
            "address": RiceAddress::item(id),
        }))?;
    }
    Ok(())
}

pub fn run_edit(
    output_mode: OutputMode,
    store: &RiceStore,
    id: i64,
    fields: &FieldMap,
) -> anyhow::Result<()> {
    let updated = store
        .update(&RiceAddress::item(id), fields, &Selection::all())
        .context("Error updating rice")?;

    if output_mode.is_human() {
        if updated == 0 {
            warn("Error updating rice");
        } else {
            success("Edited");
        }
    } else {
        emit_success(output_mode, "edit", serde_json::json!({ "updated": updated }))?;
    }
    Ok(())
}

pub fn run_delete(output_mode: OutputMode, store: &RiceStore, id: i64) -> anyhow::Result<()> {
    let deleted = store.delete(&RiceAddress::item(id), &Selection::all())?;

    if output_mode.is_human() {
        if deleted == 0 {
            warn("Error deleting");
        } else {
            println!("{} {}", Icons::DEL, "Successfully deleted".style(ui::theme().success.clone()));
        }
    } else {
        emit_success(output_mode, "delete", serde_json::json!({ "deleted": deleted }))?;
    }
    Ok(())
}

pub fn run_delete_all(
    output_mode: OutputMode,
    store: &RiceStore,
    filter: Option<String>,
    args: Vec<String>,
) -> anyhow::Result<()> {
    let selection = selection_from_args(filter, args);
    let deleted = store.delete(&RiceAddress::Collection, &selection)?;

    if output_mode.is_human() {
        println!("{} Deleted {} rice(s)", Icons::DEL, deleted);
    } else {
        emit_success(output_mode, "delete-all", serde_json::json!({ "deleted": deleted }))?;
    }
    Ok(())
}

/// Sample row inserted by `seed`
pub fn sample_rice() -> FieldMap {
    FieldMap::new()
        .with(COLUMN_NAME, "Conad Integrale")
        .with(COLUMN_BREED, "Parboiled Integrale")
        .with(COLUMN_PACKAGING, Packaging::VacuumCarton)
        .with(COLUMN_PRICE, 240)
}

pub fn run_seed(output_mode: OutputMode, store: &RiceStore) -> anyhow::Result<()> {
    let id = store.insert(&RiceAddress::Collection, &sample_rice())?;

    if output_mode.is_human() {
        println!("{} Inserted sample rice at {}", Icons::NEW, RiceAddress::item(id));
    } else {
        emit_success(output_mode, "seed", serde_json::json!({ "id": id }))?;
    }
    Ok(())
}

pub fn run_type(output_mode: OutputMode, address: &str) -> anyhow::Result<()> {
    let address = RiceAddress::parse(address)?;

    if output_mode.is_human() {
        println!("{}", address.mime_type());
    } else {
        emit_success(output_mode, "type", serde_json::json!({
            "address": address,
            "type": address.mime_type(),
        }))?;
    }
    Ok(())
}

pub fn run_stats(output_mode: OutputMode, store: &RiceStore, database: &Path) -> anyhow::Result<()> {
    let stats = store.stats()?;

    if output_mode.is_human() {
        println!("{} Risi Statistics ({})", Icons::STATS, database.display());
        let rices = stats.rices.to_string();
        let total = format_price(stats.total_price);
        let version = stats.schema_version.to_string();
        println!("{}", ui::stats_table(&[
            ("Rices", rices.as_str()),
            ("Total price", total.as_str()),
            ("Schema version", version.as_str()),
        ]));
    } else {
        emit_success(output_mode, "stats", serde_json::to_value(&stats)?)?;
    }
    Ok(())
}

pub fn run_version(output_mode: OutputMode) -> anyhow::Result<()> {
    if output_mode.is_human() {
        banner(
            &format!("{}", "Risi".bold()),
            &format!("Version {}", env!("CARGO_PKG_VERSION")),
        );
        let labels: Vec<String> = Packaging::all()
            .iter()
            .map(|p| format!("{}={}", p.as_str(), p.code()))
            .collect();
        println!("{} Packaging codes: {}", Icons::PACKAGE, labels.join(", "));
    } else {
        emit_success(output_mode, "version", serde_json::json!({
            "version": env!("CARGO_PKG_VERSION"),
        }))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fields_from_args() {
        let fields = fields_from_args(
            Some("  Carnaroli ".to_string()),
            Some("".to_string()),
            Some("bag".to_string()),
            Some("350".to_string()),
        );
        assert_eq!(fields.get_as_string("name").as_deref(), Some("Carnaroli"));
        assert_eq!(fields.get("breed"), Some(&FieldValue::Null));
        assert_eq!(fields.get_as_integer("packaging"), Some(3));
        assert_eq!(fields.get_as_integer("price"), Some(350));

        let partial = fields_from_args(None, None, None, Some("12".to_string()));
        assert_eq!(partial.len(), 1);
    }

    #[test]
    fn test_invalid_packaging_reaches_store_validation() {
        let store = RiceStore::open_in_memory().unwrap();
        let fields = fields_from_args(Some("X".to_string()), None, Some("9".to_string()), None);
        let err = store.insert(&RiceAddress::Collection, &fields).unwrap_err();
        assert!(matches!(err, risi::Error::Validation { field: "packaging", .. }));
    }

    #[test]
    fn test_seed_rice() {
        let store = RiceStore::open_in_memory().unwrap();
        run_seed(OutputMode::Json, &store).unwrap();
        let items = store
            .query(&RiceAddress::Collection, None, &Selection::all(), None)
            .unwrap()
            .to_items()
            .unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].to_fields(), sample_rice());
    }
}
