use anyhow::Result;
use std::io::Write;

use super::{summary_rows, SUMMARY_HEADERS};
use crate::models::Company;

/// Byte-order mark so spreadsheet tools detect UTF-8.
const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

const LOCATION_HEADERS: [&str; 7] = [
    "Name",
    "Document",
    "Status",
    "Latitude",
    "Longitude",
    "Address",
    "Responsible",
];

/// One row per partner with its coordinates, for map tools.
pub fn write_location_csv<W: Write>(mut out: W, companies: &[Company]) -> Result<()> {
    out.write_all(UTF8_BOM)?;
    let mut writer = csv::Writer::from_writer(out);
    writer.write_record(LOCATION_HEADERS)?;

    for c in companies {
        writer.write_record([
            c.name.clone(),
            c.identifier.display(),
            c.status.label().to_string(),
            c.location.lat.to_string(),
            c.location.lng.to_string(),
            c.address.to_string(),
            c.responsible.clone().unwrap_or_default(),
        ])?;
    }

    writer.flush()?;
    Ok(())
}

/// The summary table as CSV.
pub fn write_summary_csv<W: Write>(mut out: W, companies: &[Company]) -> Result<()> {
    out.write_all(UTF8_BOM)?;
    let mut writer = csv::Writer::from_writer(out);
    writer.write_record(SUMMARY_HEADERS)?;

    for row in summary_rows(companies) {
        writer.write_record([
            row.name,
            row.account_owner,
            row.partnership_contact,
            row.phone,
            row.status,
            row.commission,
            row.brokers.to_string(),
        ])?;
    }

    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::tests::fixture;

    fn read_back(bytes: &[u8]) -> Vec<Vec<String>> {
        assert!(bytes.starts_with(UTF8_BOM));
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .from_reader(&bytes[UTF8_BOM.len()..]);
        reader
            .records()
            .map(|r| r.unwrap().iter().map(str::to_string).collect())
            .collect()
    }

    #[test]
    fn test_location_csv() {
        let mut buf = Vec::new();
        write_location_csv(&mut buf, &fixture()).unwrap();
        let rows = read_back(&buf);

        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0], LOCATION_HEADERS);
        assert_eq!(rows[1][0], "Imobiliária Horizonte");
        assert_eq!(rows[1][1], "11.222.333/0001-81");
        assert_eq!(rows[1][2], "Active");
        assert_eq!(rows[1][3], "-23.5505");
        assert_eq!(rows[1][4], "-46.6333");
        assert_eq!(
            rows[1][5],
            "Av. Paulista, 1000 - Bela Vista - São Paulo - SP"
        );
        assert_eq!(rows[1][6], "Carla");
        // Embedded quotes survive the round trip.
        assert_eq!(rows[2][0], "Casa & Cia \"Prime\"");
    }

    #[test]
    fn test_summary_csv() {
        let mut buf = Vec::new();
        write_summary_csv(&mut buf, &fixture()).unwrap();
        let rows = read_back(&buf);

        assert_eq!(rows[0], SUMMARY_HEADERS);
        assert_eq!(
            rows[2],
            vec!["Casa & Cia \"Prime\"", "Ana", "Rita", "(11) 99876-5432", "Inactive", "4.5%", "3"]
        );
    }

    #[test]
    fn test_location_csv_empty_address_is_blank_cell() {
        let mut company = fixture().remove(0);
        company.address = Default::default();
        company.responsible = None;

        let mut buf = Vec::new();
        write_location_csv(&mut buf, &[company]).unwrap();
        let rows = read_back(&buf);
        assert_eq!(rows[1][5], "");
        assert_eq!(rows[1][6], "");
    }

    #[test]
    fn test_empty_collection_writes_headers_only() {
        let mut buf = Vec::new();
        write_location_csv(&mut buf, &[]).unwrap();
        assert_eq!(read_back(&buf).len(), 1);
    }
}
