//! Rendering of generated adapter and factory units.

use kiln_model::{AdapterDescriptor, Declaration, GeneratedUnit};

use crate::{CodeBuilder, naming::to_pascal_case};

const HEADER: &str = "// Generated by kiln. Do not edit.";

/// Name of the adapter type generated for a declaration.
pub fn adapter_name(declaration: &Declaration) -> String {
    format!("{}Adapter", to_pascal_case(declaration.name()))
}

/// Render the serialization adapter unit for a type declaration.
pub fn adapter_unit(declaration: &Declaration) -> GeneratedUnit {
    let type_name = declaration.name();
    let adapter = adapter_name(declaration);

    let mut builder = CodeBuilder::new();
    builder
        .push_line(HEADER)
        .push_blank()
        .push_line("use kiln_runtime::{JsonAdapter, JsonError, JsonReader, JsonWriter};")
        .push_blank()
        .push_line(&format!("pub struct {adapter};"))
        .push_blank()
        .push_line(&format!("impl JsonAdapter<{type_name}> for {adapter} {{"))
        .push_indent()
        .push_line(&format!(
            "fn read(&self, reader: &mut JsonReader<'_>) -> Result<{type_name}, JsonError> {{"
        ))
        .push_indent()
        .push_line("reader.decode()")
        .push_dedent()
        .push_line("}")
        .push_blank()
        .push_line(&format!(
            "fn write(&self, writer: &mut JsonWriter<'_>, value: &{type_name}) -> Result<(), JsonError> {{"
        ))
        .push_indent()
        .push_line("writer.encode(value)")
        .push_dedent()
        .push_line("}")
        .push_dedent()
        .push_line("}");

    GeneratedUnit::new(adapter, builder.build())
}

/// Render the factory unit registering every adapter generated so far.
///
/// Adapters are sorted by name before emission: batch iteration order is
/// not a contract the output may depend on.
pub fn factory_unit(declaration: &Declaration, adapters: &[AdapterDescriptor]) -> GeneratedUnit {
    let factory_name = to_pascal_case(declaration.name());

    let mut entries: Vec<(&str, &str)> = adapters
        .iter()
        .map(|descriptor| {
            (
                descriptor.declaration.name(),
                descriptor.adapter_name.as_str(),
            )
        })
        .collect();
    entries.sort();
    entries.dedup();

    let mut builder = CodeBuilder::new();
    builder
        .push_line(HEADER)
        .push_blank()
        .push_line("use kiln_runtime::{AdapterRegistry, RegistryFactory};")
        .push_blank()
        .push_line(&format!("pub struct {factory_name};"))
        .push_blank()
        .push_line(&format!("impl RegistryFactory for {factory_name} {{"))
        .push_indent()
        .push_line("fn register(&self, registry: &mut AdapterRegistry) {")
        .push_indent();
    for (type_name, adapter) in entries {
        builder.push_line(&format!("registry.add::<{type_name}>({adapter});"));
    }
    builder
        .push_dedent()
        .push_line("}")
        .push_dedent()
        .push_line("}");

    GeneratedUnit::new(factory_name, builder.build())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_adapter_name() {
        assert_eq!(adapter_name(&Declaration::for_type("Foo")), "FooAdapter");
        assert_eq!(
            adapter_name(&Declaration::for_type("user_profile")),
            "UserProfileAdapter"
        );
    }

    #[test]
    fn test_factory_entries_are_sorted() {
        let adapters = vec![
            AdapterDescriptor {
                declaration: Declaration::for_type("Zeta"),
                adapter_name: "ZetaAdapter".into(),
                unit_name: "ZetaAdapter".into(),
            },
            AdapterDescriptor {
                declaration: Declaration::for_type("Alpha"),
                adapter_name: "AlphaAdapter".into(),
                unit_name: "AlphaAdapter".into(),
            },
        ];
        let unit = factory_unit(&Declaration::for_type("AppFactory"), &adapters);

        let alpha = unit.contents.find("AlphaAdapter").unwrap();
        let zeta = unit.contents.find("ZetaAdapter").unwrap();
        assert!(alpha < zeta);
    }

    #[test]
    fn test_factory_with_no_adapters_registers_nothing() {
        let unit = factory_unit(&Declaration::for_type("AppFactory"), &[]);
        assert!(!unit.contents.contains("registry.add"));
    }
}
