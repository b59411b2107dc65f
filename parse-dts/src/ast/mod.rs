pub mod func;
pub mod import_export;
pub mod member;
pub mod node;
pub mod stmt;
pub mod type_expr;
