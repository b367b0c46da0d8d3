/*!
The basic structures the rest of the library is built from: raw pgraph node
ids, literals (a node paired with a polarity), and optuples (a module paired
with a candidate option-value assignment).
*/

pub mod atom;
pub mod literal;
pub mod optuple;
