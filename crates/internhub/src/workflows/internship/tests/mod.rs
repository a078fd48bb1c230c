mod common;

mod issuance;
mod profiles;
