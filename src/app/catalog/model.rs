//! 商品数据模型

use serde::{Deserialize, Serialize};

/// 商品记录，JSON 文件和数据表中的字段名为 `nome` / `descricao`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "database", derive(sqlx::FromRow))]
pub struct Item {
    pub id: i64,
    #[serde(rename = "nome", default)]
    pub name: String,
    #[serde(rename = "descricao", default)]
    pub description: String,
}

/// 表单提交的商品字段，缺失的字段按空字符串处理
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemDraft {
    #[serde(rename = "nome", default)]
    pub name: String,
    #[serde(rename = "descricao", default)]
    pub description: String,
}

impl ItemDraft {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }

    pub fn into_item(self, id: i64) -> Item {
        Item {
            id,
            name: self.name,
            description: self.description,
        }
    }
}

/// 按整数前缀解析路径中的 id：可选符号加前导数字，其后的字符忽略
///
/// 没有前导数字或超出 i64 范围时返回 `None`。
pub fn parse_item_id(raw: &str) -> Option<i64> {
    let s = raw.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let end = digits
        .bytes()
        .position(|b| !b.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }

    let value: i64 = digits[..end].parse().ok()?;
    Some(if negative { -value } else { value })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_item_id() {
        assert_eq!(parse_item_id("42"), Some(42));
        assert_eq!(parse_item_id("12abc"), Some(12));
        assert_eq!(parse_item_id("  7"), Some(7));
        assert_eq!(parse_item_id("-3"), Some(-3));
        assert_eq!(parse_item_id("+5"), Some(5));
        assert_eq!(parse_item_id("abc"), None);
        assert_eq!(parse_item_id(""), None);
        assert_eq!(parse_item_id("-"), None);
        assert_eq!(parse_item_id("99999999999999999999"), None);
    }

    #[test]
    fn test_item_json_field_names() {
        let item = Item {
            id: 1,
            name: "Caneta".to_string(),
            description: "Azul".to_string(),
        };
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "id": 1, "nome": "Caneta", "descricao": "Azul" })
        );
    }

    #[test]
    fn test_missing_fields_become_empty() {
        let item: Item = serde_json::from_str(r#"{ "id": 5 }"#).unwrap();
        assert_eq!(item.name, "");
        assert_eq!(item.description, "");
    }
}
