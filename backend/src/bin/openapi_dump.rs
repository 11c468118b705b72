//! Print the OpenAPI document as JSON.

use std::io::Write;

use listings::doc::ApiDoc;
use utoipa::OpenApi;

fn main() -> std::io::Result<()> {
    let json = ApiDoc::openapi()
        .to_pretty_json()
        .map_err(|error| std::io::Error::other(format!("serialise OpenAPI document: {error}")))?;
    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{json}")
}
