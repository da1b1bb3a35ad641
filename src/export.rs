use std::path::{Path, PathBuf};

use crate::model::{self, Deal};

pub const REPORT_HEADER: &str = "ID,Empresa,Contacto,Email,Telefono,Pais,Vendedor,USD,Estado";

/// The CSV report text: a fixed header plus one row per deal. Every field
/// is double-quoted except the numeric USD value.
pub fn csv_report(deals: &[Deal]) -> String {
    let mut lines = Vec::with_capacity(deals.len() + 1);
    lines.push(REPORT_HEADER.to_string());
    for deal in deals {
        lines.push(format!(
            "\"{}\",\"{}\",\"{}\",\"{}\",\"{}\",\"{}\",\"{}\",{},\"{}\"",
            deal.id,
            deal.organization,
            deal.contact_name,
            deal.email,
            deal.phone,
            deal.country.as_str(),
            model::seller_name(&deal.seller_id),
            deal.value,
            deal.status.as_str(),
        ));
    }
    lines.join("\n")
}

pub fn report_filename(date: chrono::NaiveDate) -> String {
    format!("HungersCRM_Export_{}.csv", date.format("%Y-%m-%d"))
}

/// Writes the report into `dir` under a date-stamped filename and returns
/// the full path.
pub fn write_report(dir: &Path, deals: &[Deal]) -> Result<PathBuf, String> {
    let path = dir.join(report_filename(chrono::Local::now().date_naive()));
    std::fs::write(&path, csv_report(deals))
        .map_err(|e| format!("Failed to write CSV report: {}", e))?;
    log::info!("Exported {} deals to {}", deals.len(), path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::seed_deals;

    #[test]
    fn two_deal_report_has_header_plus_two_rows() {
        let report = csv_report(&seed_deals());
        let lines: Vec<&str> = report.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "ID,Empresa,Contacto,Email,Telefono,Pais,Vendedor,USD,Estado");
        assert_eq!(
            lines[1],
            "\"1\",\"El Olivo Gourmet\",\"Carlos García\",\"carlos@elolivo.com\",\"+57 300 123 4567\",\"Colombia\",\"Andrés Mendoza\",12000,\"Lead In\""
        );
        assert!(lines[2].starts_with("\"2\",\"Foodie Corp\""));
        assert!(lines[2].contains(",45000,"));
        assert!(lines[2].ends_with("\"Contactado\""));
    }

    #[test]
    fn empty_collection_yields_header_only() {
        assert_eq!(csv_report(&[]), REPORT_HEADER);
    }

    #[test]
    fn dangling_seller_renders_placeholder() {
        let mut deals = seed_deals();
        deals[0].seller_id = "sel-borrado".to_string();
        let report = csv_report(&deals[..1]);
        assert!(report.lines().nth(1).expect("row").contains("\"N/A\""));
    }

    #[test]
    fn filename_is_date_stamped() {
        let date = chrono::NaiveDate::from_ymd_opt(2025, 2, 7).expect("date");
        assert_eq!(report_filename(date), "HungersCRM_Export_2025-02-07.csv");
    }

    #[test]
    fn report_lands_on_disk() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = write_report(dir.path(), &seed_deals()).expect("write");
        let content = std::fs::read_to_string(path).expect("read back");
        assert_eq!(content.lines().count(), 3);
    }
}
