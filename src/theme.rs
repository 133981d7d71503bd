use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Theme {
    pub font_family: String,
    pub font_size: f32,
    pub person_fill: String,
    pub item_fill: String,
    pub node_border_color: String,
    pub text_color: String,
    pub line_color: String,
    pub label_color: String,
    pub label_background: String,
    pub background: String,
}

impl Theme {
    pub fn classic() -> Self {
        Self {
            font_family: "\"trebuchet ms\", verdana, arial, sans-serif".to_string(),
            font_size: 14.0,
            person_fill: "#ECECFF".to_string(),
            item_fill: "#FFFFDE".to_string(),
            node_border_color: "#9370DB".to_string(),
            text_color: "#333333".to_string(),
            line_color: "#333333".to_string(),
            label_color: "#333333".to_string(),
            label_background: "#E8E8E8".to_string(),
            background: "#FFFFFF".to_string(),
        }
    }

    pub fn modern() -> Self {
        Self {
            font_family: "Inter, Segoe UI, system-ui, -apple-system, sans-serif".to_string(),
            font_size: 13.0,
            person_fill: "#F8FAFF".to_string(),
            item_fill: "#EEF2F8".to_string(),
            node_border_color: "#C7D2E5".to_string(),
            text_color: "#1C2430".to_string(),
            line_color: "#7A8AA6".to_string(),
            label_color: "#1C2430".to_string(),
            label_background: "#FFFFFF".to_string(),
            background: "#FFFFFF".to_string(),
        }
    }
}
