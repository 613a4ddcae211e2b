pub mod balances;
pub mod check_expression;
pub mod dispatch;
pub mod draft;
pub mod initialise;
pub mod new_year;
pub mod standard_load;
