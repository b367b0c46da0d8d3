/// A single tunable knob, with the bounds it's valid over and a label used
/// in diagnostics.
#[derive(Clone, Debug)]
pub struct ConfigOption<T> {
    pub name: &'static str,
    pub min: T,
    pub max: T,
    pub value: T,
}
