//! WordprocessingML element and attribute names

pub const BODY: &str = "w:body";
pub const PARAGRAPH: &str = "w:p";
pub const PARAGRAPH_PROPS: &str = "w:pPr";
pub const RUN: &str = "w:r";
pub const RUN_PROPS: &str = "w:rPr";
pub const TEXT: &str = "w:t";
pub const TAB: &str = "w:tab";
pub const BREAK: &str = "w:br";
pub const CARRIAGE_RETURN: &str = "w:cr";
pub const UNDERLINE: &str = "w:u";
pub const VAL: &str = "w:val";
pub const XML_SPACE: &str = "xml:space";

pub const TABLE: &str = "w:tbl";
pub const TABLE_ROW: &str = "w:tr";
pub const TABLE_ROW_PROPS: &str = "w:trPr";
pub const TABLE_CELL: &str = "w:tc";
pub const TABLE_CELL_PROPS: &str = "w:tcPr";
pub const GRID_SPAN: &str = "w:gridSpan";
pub const GRID_BEFORE: &str = "w:gridBefore";
pub const VERTICAL_MERGE: &str = "w:vMerge";

pub const FIELD_CHAR: &str = "w:fldChar";
pub const INSTR_TEXT: &str = "w:instrText";
pub const FORM_FIELD_DATA: &str = "w:ffData";
pub const CHECKBOX: &str = "w:checkBox";
pub const CHECKED: &str = "w:checked";
pub const DEFAULT: &str = "w:default";
pub const DRAWING: &str = "w:drawing";

/// Inline containers whose runs still belong to the paragraph text
pub const RUN_CONTAINERS: &[&str] = &[
    "w:hyperlink",
    "w:ins",
    "w:smartTag",
    "w:customXml",
    "w:sdt",
    "w:sdtContent",
    "w:fldSimple",
    "w:moveTo",
];

/// Run properties that must follow `w:u` inside `w:rPr`
pub const RUN_PROPS_AFTER_UNDERLINE: &[&str] = &[
    "w:effect",
    "w:bdr",
    "w:shd",
    "w:fitText",
    "w:vertAlign",
    "w:rtl",
    "w:cs",
    "w:em",
    "w:lang",
    "w:eastAsianLayout",
    "w:specVanish",
    "w:oMath",
];
