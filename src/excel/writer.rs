/*!
 * Excel write-back: rebuild `xl/sharedStrings.xml` from the translated
 * string table. Everything else in the package is left byte-identical.
 */

use std::io::Cursor;

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use crate::document::package::OpcPackage;
use crate::errors::DocumentError;

const SHARED_STRINGS_PART: &str = "xl/sharedStrings.xml";
const SPREADSHEET_NS: &str = "http://schemas.openxmlformats.org/spreadsheetml/2006/main";

/// Replace the shared string table in `package` with `strings`
pub fn patch_shared_strings(
    package: &mut OpcPackage,
    strings: &[String],
) -> Result<(), DocumentError> {
    let mut writer = Writer::new(Cursor::new(Vec::new()));
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))?;

    let mut sst = BytesStart::new("sst");
    sst.push_attribute(("xmlns", SPREADSHEET_NS));
    let count = strings.len().to_string();
    sst.push_attribute(("count", count.as_str()));
    sst.push_attribute(("uniqueCount", count.as_str()));
    writer.write_event(Event::Start(sst))?;

    for text in strings {
        writer.write_event(Event::Start(BytesStart::new("si")))?;
        let mut t = BytesStart::new("t");
        // translations append newlines; keep all whitespace
        t.push_attribute(("xml:space", "preserve"));
        writer.write_event(Event::Start(t))?;
        writer.write_event(Event::Text(BytesText::new(text)))?;
        writer.write_event(Event::End(BytesEnd::new("t")))?;
        writer.write_event(Event::End(BytesEnd::new("si")))?;
    }
    writer.write_event(Event::End(BytesEnd::new("sst")))?;

    let bytes = writer.into_inner().into_inner();
    package.set_part(SHARED_STRINGS_PART, bytes);
    Ok(())
}
