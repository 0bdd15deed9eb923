use serde::Serialize;
use serde_json::{json, Map, Value};

use crate::assemble::{resolve_columns, template_for_table};
use crate::mcp::protocol::*;
use crate::mcp::session::Session;
use crate::naming::{split_join, CaseStyle};
use crate::schema::SchemaReader;

/// Returns the list of tools the fieldsmith server exposes.
pub fn list_tools() -> Vec<ToolDefinition> {
    let styles: Vec<&str> = CaseStyle::ALL.iter().map(|s| s.name()).collect();

    vec![
        ToolDefinition {
            name: "convert_case".into(),
            description: "Converts an identifier to camelCase, PascalCase, snake_case, \
                          kebab-case or their upper-case variants. Returns every style \
                          when no style is given."
                .into(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "input": {
                        "type": "string",
                        "description": "Identifier in any naming convention"
                    },
                    "style": {
                        "type": "string",
                        "enum": styles,
                        "description": "Target naming convention"
                    }
                },
                "required": ["input"]
            }),
        },
        ToolDefinition {
            name: "split_join".into(),
            description: "Removes the excluded substrings, splits the rest into words \
                          and non-letter runs, and joins them with the given joiner."
                .into(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "input": { "type": "string" },
                    "joiner": { "type": "string" },
                    "excludes": {
                        "type": "array",
                        "items": { "type": "string" },
                        "description": "Substrings removed before splitting"
                    }
                },
                "required": ["input", "joiner"]
            }),
        },
        ToolDefinition {
            name: "list_tables".into(),
            description: "Lists the tables of the connected database.".into(),
            input_schema: json!({
                "type": "object",
                "properties": {},
                "required": []
            }),
        },
        ToolDefinition {
            name: "describe_table".into(),
            description: "Returns the column descriptors of a table with generated field \
                          name, type and remark resolved."
                .into(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "table": {
                        "type": "string",
                        "description": "Table name"
                    }
                },
                "required": ["table"]
            }),
        },
        ToolDefinition {
            name: "build_template".into(),
            description: "Builds the template descriptor (class name, package, ordered \
                          field attributes) for generating one file from a table."
                .into(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "table": { "type": "string", "description": "Table name" },
                    "file": { "type": "string", "description": "Template identifier" },
                    "class_name": { "type": "string" },
                    "package_name": { "type": "string" }
                },
                "required": ["table", "file"]
            }),
        },
    ]
}

/// Dispatches a tool call and returns the result.
pub fn call_tool(session: &Session, name: &str, args: &Value) -> ToolCallResult {
    match name {
        "convert_case" => {
            let input = args["input"].as_str().unwrap_or("");
            let separators = session.config.separators();
            match args["style"].as_str() {
                Some(style_name) => match CaseStyle::from_name(style_name) {
                    Some(style) => json_result(&json!({
                        "input": input,
                        "style": style.name(),
                        "result": style.apply_with(input, &separators),
                    })),
                    None => error_result(format!("Unknown style '{}'", style_name)),
                },
                None => {
                    let all: Map<String, Value> = CaseStyle::ALL
                        .iter()
                        .map(|style| {
                            (
                                style.name().to_string(),
                                Value::String(style.apply_with(input, &separators)),
                            )
                        })
                        .collect();
                    json_result(&all)
                }
            }
        }

        "split_join" => {
            let input = args["input"].as_str().unwrap_or("");
            let Some(joiner) = args["joiner"].as_str() else {
                return error_result("Missing 'joiner'".into());
            };
            let excludes: Vec<&str> = args["excludes"]
                .as_array()
                .map(|items| items.iter().filter_map(Value::as_str).collect())
                .unwrap_or_default();
            json_result(&json!({ "result": split_join(input, joiner, &excludes) }))
        }

        "list_tables" => with_schema(session, |schema| match schema.tables() {
            Ok(tables) => json_result(&tables),
            Err(e) => error_result(format!("{e:#}")),
        }),

        "describe_table" => {
            let table = args["table"].as_str().unwrap_or("");
            with_schema(session, |schema| {
                let columns = match schema.columns(table) {
                    Ok(columns) => columns,
                    Err(e) => return error_result(format!("{e:#}")),
                };
                match resolve_columns(&columns, &session.config) {
                    Ok(resolved) => json_result(&resolved),
                    Err(e) => error_result(e.to_string()),
                }
            })
        }

        "build_template" => {
            let table = args["table"].as_str().unwrap_or("");
            let file = args["file"].as_str().unwrap_or("");
            if file.is_empty() {
                return error_result("Missing 'file'".into());
            }
            with_schema(session, |schema| {
                let columns = match schema.columns(table) {
                    Ok(columns) => columns,
                    Err(e) => return error_result(format!("{e:#}")),
                };
                let mut config = session.config.clone();
                if let Some(package) = args["package_name"].as_str() {
                    config.template.package_name = Some(package.to_string());
                }
                let class_name = args["class_name"].as_str();
                match template_for_table(table, &columns, &config, file, class_name) {
                    Ok(template) => json_result(&template),
                    Err(e) => error_result(e.to_string()),
                }
            })
        }

        _ => error_result(format!("Unknown tool: {}", name)),
    }
}

fn with_schema(session: &Session, f: impl FnOnce(&SchemaReader) -> ToolCallResult) -> ToolCallResult {
    match &session.schema {
        Some(schema) => f(schema),
        None => error_result("No database connected. Start the server with --db <path>.".into()),
    }
}

fn json_result<T: Serialize>(value: &T) -> ToolCallResult {
    match serde_json::to_string(value) {
        Ok(text) => text_result(text),
        Err(e) => error_result(format!("Failed to encode result: {e}")),
    }
}

fn text_result(text: String) -> ToolCallResult {
    ToolCallResult {
        content: vec![ContentBlock::Text { text }],
        is_error: None,
    }
}

fn error_result(msg: String) -> ToolCallResult {
    ToolCallResult {
        content: vec![ContentBlock::Text { text: msg }],
        is_error: Some(true),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use rusqlite::Connection;

    fn test_session() -> Session {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            "CREATE TABLE sys_user (
                id        INTEGER PRIMARY KEY,
                user_name VARCHAR(64) NOT NULL,
                shape     GEOMETRY
            );
            CREATE TABLE t_order (
                id    INTEGER PRIMARY KEY,
                total DECIMAL(10, 2)
            );",
        )
        .unwrap();
        let config = Config::from_json(
            r#"{"table_prefixes": ["t_"], "type_map": {"geometry": "geo::Geometry"}}"#,
        )
        .unwrap();
        Session::new(config, Some(SchemaReader::from_connection(conn)))
    }

    fn text(result: &ToolCallResult) -> &str {
        match &result.content[0] {
            ContentBlock::Text { text } => text,
        }
    }

    #[test]
    fn test_convert_case_single_style() {
        let session = Session::new(Config::default(), None);
        let result = call_tool(
            &session,
            "convert_case",
            &json!({"input": "user_name", "style": "pascal"}),
        );
        assert!(result.is_error.is_none());
        assert!(text(&result).contains("\"result\":\"UserName\""));
    }

    #[test]
    fn test_convert_case_all_styles() {
        let session = Session::new(Config::default(), None);
        let result = call_tool(&session, "convert_case", &json!({"input": "UserName"}));
        let value: Value = serde_json::from_str(text(&result)).unwrap();
        assert_eq!(value["camel"], "userName");
        assert_eq!(value["kebab"], "user-name");
        assert_eq!(value["upper_snake"], "USER_NAME");
    }

    #[test]
    fn test_convert_case_unknown_style() {
        let session = Session::new(Config::default(), None);
        let result = call_tool(
            &session,
            "convert_case",
            &json!({"input": "x", "style": "title"}),
        );
        assert_eq!(result.is_error, Some(true));
    }

    #[test]
    fn test_split_join() {
        let session = Session::new(Config::default(), None);
        let result = call_tool(
            &session,
            "split_join",
            &json!({"input": "SysUserRole", "joiner": "/", "excludes": ["Sys"]}),
        );
        assert!(text(&result).contains("user/role"));
    }

    #[test]
    fn test_schema_tools_need_a_database() {
        let session = Session::new(Config::default(), None);
        let result = call_tool(&session, "list_tables", &json!({}));
        assert_eq!(result.is_error, Some(true));
        assert!(text(&result).contains("--db"));
    }

    #[test]
    fn test_list_tables() {
        let result = call_tool(&test_session(), "list_tables", &json!({}));
        assert_eq!(text(&result), r#"["sys_user","t_order"]"#);
    }

    #[test]
    fn test_describe_table_resolves_fields() {
        let result = call_tool(&test_session(), "describe_table", &json!({"table": "sys_user"}));
        assert!(result.is_error.is_none());
        let columns: Value = serde_json::from_str(text(&result)).unwrap();
        assert_eq!(columns[1]["field_name"], "userName");
        assert_eq!(columns[1]["field_type"], "String");
        assert_eq!(columns[2]["field_type"], "geo::Geometry");
    }

    #[test]
    fn test_describe_unknown_table() {
        let result = call_tool(&test_session(), "describe_table", &json!({"table": "nope"}));
        assert_eq!(result.is_error, Some(true));
        assert!(text(&result).contains("Table not found"));
    }

    #[test]
    fn test_build_template() {
        let result = call_tool(
            &test_session(),
            "build_template",
            &json!({"table": "t_order", "file": "entity.tpl", "package_name": "shop"}),
        );
        assert!(result.is_error.is_none());
        let template: Value = serde_json::from_str(text(&result)).unwrap();
        assert_eq!(template["class_name"], "Order");
        assert_eq!(template["package_name"], "shop");
        assert_eq!(template["override"], true);
        assert_eq!(template["attributes"][0]["key"], "id");
        assert_eq!(template["attributes"][1]["key"], "total");
    }

    #[test]
    fn test_unknown_tool() {
        let session = Session::new(Config::default(), None);
        let result = call_tool(&session, "nonexistent_tool", &json!({}));
        assert_eq!(result.is_error, Some(true));
    }

    #[test]
    fn test_list_tools_count() {
        assert_eq!(list_tools().len(), 5);
    }
}
