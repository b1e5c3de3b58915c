/// A named telemetry or command field bound to a parameter type.
#[derive(Debug, Clone, Default)]
pub struct Parameter {
    pub name: String,
    pub parameter_type_ref: String,
    pub parameter_properties: Option<ParameterProperties>,
}

impl Parameter {
    pub fn new(name: impl Into<String>, parameter_type_ref: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parameter_type_ref: parameter_type_ref.into(),
            parameter_properties: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ParameterProperties {
    pub system_name: String,
    pub data_source: String,
    pub persistence: bool,
    pub read_only: bool,
}

impl Default for ParameterProperties {
    fn default() -> Self {
        Self {
            system_name: String::new(),
            data_source: String::new(),
            persistence: true,
            read_only: false,
        }
    }
}

/// A command field; arguments only appear in meta-commands.
#[derive(Debug, Clone, Default)]
pub struct Argument {
    pub name: String,
    pub argument_type_ref: String,
}

impl Argument {
    pub fn new(name: impl Into<String>, argument_type_ref: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            argument_type_ref: argument_type_ref.into(),
        }
    }
}

/// Engineering unit attached to a numeric type. Metadata only.
#[derive(Debug, Clone)]
pub struct Unit {
    pub power: f64,
    pub factor: i64,
    pub description: String,
    pub form: String,
    pub value: String,
}

/// One label of an enumerated type. Metadata only; the bit codec treats
/// enumerated fields as their underlying integer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Enumeration {
    pub value: i64,
    pub label: String,
}

impl Enumeration {
    pub fn new(value: i64, label: impl Into<String>) -> Self {
        Self {
            value,
            label: label.into(),
        }
    }
}
