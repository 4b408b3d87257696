use super::{ExportError, ExportPayload, Exporter};

/// Machine-readable export for re-sharing or importing elsewhere.
pub struct JsonExporter;

impl Exporter for JsonExporter {
    fn label(&self) -> &'static str {
        "JSON"
    }

    fn file_name(&self, payload: &ExportPayload) -> String {
        format!("{}-setlist.json", payload.artist_slug)
    }

    fn render(&self, payload: &ExportPayload) -> Result<Vec<u8>, ExportError> {
        let mut json = serde_json::to_vec_pretty(payload)?;
        json.push(b'\n');
        Ok(json)
    }
}
