use std::collections::HashMap;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;

use serde::Serialize;

use crate::error::{CcvError, InputSource, Result};
use crate::types::{FileRecord, FunctionRecord};

// lizard --csv column layout:
// NLOC,CCN,token,PARAM,length,location,file,function,long_name,start,end
const COL_CCN: usize = 1;
const COL_FILE: usize = 6;
const COL_FUNCTION: usize = 7;
const MIN_COLUMNS: usize = 8;

// lizard --xml puts CCN third unless the labels say otherwise
const XML_DEFAULT_CCN_COLUMN: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ComplexityFormat {
    /// `lizard --csv` function report.
    Csv,
    /// `lizard --xml` (cppncss-style) report.
    Xml,
    /// `[{"path": ..., "functions": [{"name": ..., "complexity": ...}]}]`
    Json,
}

impl ComplexityFormat {
    /// `.json` and `.xml` files pick their format, everything else is read as lizard CSV.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => ComplexityFormat::Json,
            Some(ext) if ext.eq_ignore_ascii_case("xml") => ComplexityFormat::Xml,
            _ => ComplexityFormat::Csv,
        }
    }
}

impl FromStr for ComplexityFormat {
    type Err = CcvError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "csv" | "lizard" => Ok(ComplexityFormat::Csv),
            "xml" => Ok(ComplexityFormat::Xml),
            "json" => Ok(ComplexityFormat::Json),
            other => Err(CcvError::config(format!(
                "invalid complexity format \"{other}\" (expected \"csv\", \"xml\" or \"json\")"
            ))),
        }
    }
}

pub fn read_complexity<R: Read>(mut reader: R, format: ComplexityFormat) -> Result<Vec<FileRecord>> {
    let mut content = String::new();
    reader
        .read_to_string(&mut content)
        .map_err(|e| CcvError::parse(InputSource::Complexity, None, format!("cannot read input: {e}")))?;
    let files = match format {
        ComplexityFormat::Csv  => parse_lizard_csv(&content)?,
        ComplexityFormat::Xml  => parse_lizard_xml(&content)?,
        ComplexityFormat::Json => parse_json(&content)?,
    };
    log::debug!(
        "Read {} files, {} functions of complexity data",
        files.len(),
        files.iter().map(|f| f.functions.len()).sum::<usize>()
    );
    Ok(files)
}

/// Collects functions per file, keeping files and functions in input order.
#[derive(Default)]
struct FileGrouper {
    files: Vec<FileRecord>,
    index: HashMap<String, usize>,
}

impl FileGrouper {
    fn push(&mut self, path: &str, function: FunctionRecord) {
        let files = &mut self.files;
        let slot = *self.index.entry(path.to_string()).or_insert_with(|| {
            files.push(FileRecord { path: path.to_string(), functions: Vec::new() });
            files.len() - 1
        });
        files[slot].functions.push(function);
    }

    fn finish(self) -> Vec<FileRecord> {
        self.files
    }
}

fn complexity_error(line: Option<usize>, message: impl Into<String>) -> CcvError {
    CcvError::parse(InputSource::Complexity, line, message)
}

fn parse_ccn(raw: &str, line: Option<usize>) -> Result<u32> {
    raw.trim().parse().map_err(|_| complexity_error(line, format!("invalid CCN \"{}\"", raw.trim())))
}

/// Groups lizard CSV rows by file. A leading `NLOC,...` header row is skipped.
pub fn parse_lizard_csv(content: &str) -> Result<Vec<FileRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());

    let mut grouper = FileGrouper::default();
    let mut first_row = true;

    for result in reader.records() {
        let record = result.map_err(|e| {
            let line = e.position().map(|p| p.line() as usize);
            complexity_error(line, e.to_string())
        })?;
        if record.iter().all(str::is_empty) {
            continue;
        }
        let line = record.position().map(|p| p.line() as usize);
        if std::mem::take(&mut first_row) && record.get(0) == Some("NLOC") {
            continue;
        }
        if record.len() < MIN_COLUMNS {
            return Err(complexity_error(
                line,
                format!("expected at least {MIN_COLUMNS} columns, found {}", record.len()),
            ));
        }

        let complexity = parse_ccn(&record[COL_CCN], line)?;
        let path = &record[COL_FILE];
        if path.is_empty() {
            return Err(complexity_error(line, "empty file path"));
        }
        grouper.push(path, FunctionRecord { name: record[COL_FUNCTION].to_string(), complexity });
    }

    Ok(grouper.finish())
}

/// Reads the `Function` measure of a `lizard --xml` report. Each item is named
/// `name(...) at path:line`; the CCN column is located through the labels.
pub fn parse_lizard_xml(content: &str) -> Result<Vec<FileRecord>> {
    let doc = roxmltree::Document::parse(content)
        .map_err(|e| complexity_error(Some(e.pos().row as usize), e.to_string()))?;
    let line_of = |node: roxmltree::Node| Some(doc.text_pos_at(node.range().start).row as usize);

    let measure = doc
        .root_element()
        .children()
        .find(|n| n.has_tag_name("measure") && n.attribute("type") == Some("Function"))
        .ok_or_else(|| complexity_error(None, "no <measure type=\"Function\"> element"))?;

    let ccn_column = measure
        .children()
        .find(|n| n.has_tag_name("labels"))
        .and_then(|labels| {
            labels
                .children()
                .filter(|n| n.has_tag_name("label"))
                .position(|n| n.text().map(str::trim) == Some("CCN"))
        })
        .unwrap_or(XML_DEFAULT_CCN_COLUMN);

    let mut grouper = FileGrouper::default();
    for item in measure.children().filter(|n| n.has_tag_name("item")) {
        let line = line_of(item);
        let label = item
            .attribute("name")
            .ok_or_else(|| complexity_error(line, "<item> without a name"))?;
        let (name, path) = split_item_name(label)
            .ok_or_else(|| complexity_error(line, format!("cannot read function location from \"{label}\"")))?;

        let value = item
            .children()
            .filter(|n| n.has_tag_name("value"))
            .nth(ccn_column)
            .ok_or_else(|| complexity_error(line, format!("missing CCN value for \"{label}\"")))?;
        let complexity = parse_ccn(value.text().unwrap_or_default(), line_of(value))?;

        grouper.push(path, FunctionRecord { name: name.to_string(), complexity });
    }

    Ok(grouper.finish())
}

/// `"run(...) at ./src/main.c:30"` -> `("run", "./src/main.c")`
fn split_item_name(label: &str) -> Option<(&str, &str)> {
    let (function, location) = label.rsplit_once(" at ")?;
    let path = match location.rsplit_once(':') {
        Some((path, line)) if line.bytes().all(|b| b.is_ascii_digit()) => path,
        _ => location,
    };
    let name = function.strip_suffix("(...)").unwrap_or(function).trim();
    let path = path.trim();
    if path.is_empty() { None } else { Some((name, path)) }
}

pub fn parse_json(content: &str) -> Result<Vec<FileRecord>> {
    let files: Vec<FileRecord> = serde_json::from_str(content)
        .map_err(|e| complexity_error(Some(e.line()), e.to_string()))?;
    if let Some(pos) = files.iter().position(|f| f.path.trim().is_empty()) {
        return Err(complexity_error(None, format!("entry {} has an empty path", pos + 1)));
    }
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const LIZARD: &str = "\
NLOC,CCN,token,PARAM,length,location,file,function,long_name,start,end
10,5,50,1,12,\"main@5-16@./src/main.c\",\"./src/main.c\",\"main\",\"main( int argc , char * argv [ ] )\",5,16
4,10,20,0,4,\"helper@20-23@./src/util.c\",\"./src/util.c\",\"helper\",\"helper( )\",20,23
8,15,40,2,9,\"run@30-38@./src/main.c\",\"./src/main.c\",\"run\",\"run( a , b )\",30,38
";

    const LIZARD_XML: &str = r#"<?xml version="1.0" ?>
<?xml-stylesheet type="text/xsl" href="lizard.xsl"?>
<cppncss>
    <measure type="Function">
        <labels>
            <label>Nr.</label>
            <label>NCSS</label>
            <label>CCN</label>
        </labels>
        <item name="main(...) at ./src/main.c:5">
            <value>1</value>
            <value>10</value>
            <value>5</value>
        </item>
        <item name="helper(...) at ./src/util.c:20">
            <value>2</value>
            <value>4</value>
            <value>10</value>
        </item>
        <item name="Parser::run(...) at ./src/main.c:30">
            <value>3</value>
            <value>8</value>
            <value>15</value>
        </item>
        <average label="NCSS" value="7"/>
    </measure>
    <measure type="File">
        <labels><label>Nr.</label><label>NCSS</label><label>CCN</label><label>Functions</label></labels>
        <item name="./src/main.c"><value>1</value><value>18</value><value>20</value><value>2</value></item>
    </measure>
</cppncss>
"#;

    fn summary(files: &[FileRecord]) -> Vec<(&str, Vec<(&str, u32)>)> {
        files
            .iter()
            .map(|f| (f.path.as_str(), f.functions.iter().map(|g| (g.name.as_str(), g.complexity)).collect()))
            .collect()
    }

    #[test]
    fn test_lizard_rows_grouped_by_file() {
        let files = parse_lizard_csv(LIZARD).unwrap();
        assert_eq!(
            summary(&files),
            vec![
                ("./src/main.c", vec![("main", 5), ("run", 15)]),
                ("./src/util.c", vec![("helper", 10)]),
            ]
        );
    }

    #[test]
    fn test_headerless_csv() {
        let body = LIZARD.lines().skip(1).collect::<Vec<_>>().join("\n");
        assert_eq!(parse_lizard_csv(&body).unwrap().len(), 2);
    }

    #[test]
    fn test_header_after_blank_line_is_skipped() {
        let input = format!("\n{LIZARD}");
        assert_eq!(parse_lizard_csv(&input).unwrap().len(), 2);
    }

    #[test]
    fn test_quoted_field_spanning_lines() {
        let input = "4,7,20,1,4,\"h@1-4@a.c\",\"a.c\",\"h\",\"h( int\nx )\",1,4\n3,2,9,0,3,\"g@6-8@a.c\",\"a.c\",\"g\",\"g( )\",6,8\n";
        let files = parse_lizard_csv(input).unwrap();
        assert_eq!(summary(&files), vec![("a.c", vec![("h", 7), ("g", 2)])]);
    }

    #[test]
    fn test_quoted_comma_in_path() {
        let input = "1,3,5,0,1,\"f@1-1@a, b.c\",\"a, b.c\",\"f\",\"f( )\",1,1\n";
        assert_eq!(parse_lizard_csv(input).unwrap()[0].path, "a, b.c");
    }

    #[test]
    fn test_non_numeric_ccn_reports_line() {
        let input = "10,5,50,1,12,loc,f.c,fn,long,1,2\n10,abc,50,1,12,loc,f.c,fn,long,1,2\n";
        let err = parse_lizard_csv(input).unwrap_err();
        assert!(matches!(err, CcvError::Parse { source_kind: InputSource::Complexity, line: Some(2), .. }));
        assert!(err.to_string().contains("invalid CCN"), "{err}");
    }

    #[test]
    fn test_short_row_is_error() {
        let err = parse_lizard_csv("10,5,50\n").unwrap_err();
        assert!(err.to_string().contains("columns"), "{err}");
    }

    #[test]
    fn test_lizard_xml_function_measure() {
        let files = parse_lizard_xml(LIZARD_XML).unwrap();
        assert_eq!(
            summary(&files),
            vec![
                ("./src/main.c", vec![("main", 5), ("Parser::run", 15)]),
                ("./src/util.c", vec![("helper", 10)]),
            ]
        );
    }

    #[test]
    fn test_lizard_xml_ccn_column_from_labels() {
        let xml = r#"<cppncss><measure type="Function">
            <labels><label>CCN</label><label>NCSS</label></labels>
            <item name="f(...) at a.c:1"><value>9</value><value>40</value></item>
        </measure></cppncss>"#;
        assert_eq!(parse_lizard_xml(xml).unwrap()[0].functions[0].complexity, 9);
    }

    #[test]
    fn test_lizard_xml_bad_ccn_is_parse_error() {
        let xml = "<cppncss><measure type=\"Function\">\n\
                   <item name=\"f(...) at a.c:1\">\n<value>1</value><value>2</value><value>x</value></item>\n\
                   </measure></cppncss>";
        let err = parse_lizard_xml(xml).unwrap_err();
        assert!(matches!(err, CcvError::Parse { source_kind: InputSource::Complexity, line: Some(3), .. }), "{err}");
    }

    #[test]
    fn test_malformed_xml_is_parse_error() {
        let err = read_complexity(Cursor::new("<cppncss><measure>"), ComplexityFormat::Xml).unwrap_err();
        assert!(matches!(err, CcvError::Parse { source_kind: InputSource::Complexity, line: Some(_), .. }));
    }

    #[test]
    fn test_xml_without_function_measure_is_error() {
        let err = parse_lizard_xml("<cppncss/>").unwrap_err();
        assert!(err.to_string().contains("Function"), "{err}");
    }

    #[test]
    fn test_split_item_name() {
        assert_eq!(split_item_name("run(...) at ./src/main.c:30"), Some(("run", "./src/main.c")));
        assert_eq!(split_item_name("f(...) at C:\\src\\a.c:7"), Some(("f", "C:\\src\\a.c")));
        assert_eq!(split_item_name("no location"), None);
    }

    #[test]
    fn test_json_format() {
        let json = r#"[
            {"path": "a.rs", "functions": [{"name": "f", "complexity": 3}, {"name": "g", "complexity": 7}]},
            {"path": "b.rs"}
        ]"#;
        let files = read_complexity(Cursor::new(json), ComplexityFormat::Json).unwrap();
        assert_eq!(files.len(), 2);
        assert_eq!(files[0].functions[1], FunctionRecord { name: "g".into(), complexity: 7 });
        assert!(files[1].functions.is_empty());
    }

    #[test]
    fn test_invalid_json_is_parse_error() {
        let err = read_complexity(Cursor::new("[{\"path\": "), ComplexityFormat::Json).unwrap_err();
        assert!(matches!(err, CcvError::Parse { source_kind: InputSource::Complexity, .. }));
    }

    #[test]
    fn test_negative_complexity_rejected_in_json() {
        let json = r#"[{"path": "a.rs", "functions": [{"name": "f", "complexity": -1}]}]"#;
        assert!(parse_json(json).is_err());
    }

    #[test]
    fn test_format_from_path_and_str() {
        assert_eq!(ComplexityFormat::from_path(Path::new("report.JSON")), ComplexityFormat::Json);
        assert_eq!(ComplexityFormat::from_path(Path::new("lizard.xml")), ComplexityFormat::Xml);
        assert_eq!(ComplexityFormat::from_path(Path::new("lizard.csv")), ComplexityFormat::Csv);
        assert_eq!("lizard".parse::<ComplexityFormat>().unwrap(), ComplexityFormat::Csv);
        assert_eq!("XML".parse::<ComplexityFormat>().unwrap(), ComplexityFormat::Xml);
        assert!("yaml".parse::<ComplexityFormat>().is_err());
    }
}
