use crate::cli::utils::output_table;
use crate::cli::OutputFormat;
use crate::filter::SortDirection;
use crate::resources::{Operations, ResourceDescriptor, ResourceRegistry};

pub fn handle(output_format: OutputFormat) -> anyhow::Result<()> {
    let registry = ResourceRegistry::standard();
    let rows: Vec<Vec<String>> = registry.iter().map(|d| describe(d)).collect();

    output_table(&output_format, &["path", "collection", "idField", "sort", "operations"], &rows)
}

fn describe(descriptor: &ResourceDescriptor) -> Vec<String> {
    let sort = match descriptor.default_sort {
        Some(spec) => match spec.direction {
            SortDirection::Asc => format!("{} asc", spec.field),
            SortDirection::Desc => format!("{} desc", spec.field),
        },
        None => "-".to_string(),
    };

    vec![
        descriptor.path(),
        descriptor.collection.name.to_string(),
        descriptor.id_field.to_string(),
        sort,
        operation_list(&descriptor.operations),
    ]
}

fn operation_list(ops: &Operations) -> String {
    [
        (ops.list, "list"),
        (ops.get, "get"),
        (ops.create, "create"),
        (ops.update, "update"),
        (ops.delete, "delete"),
    ]
    .iter()
    .filter(|(enabled, _)| *enabled)
    .map(|(_, name)| *name)
    .collect::<Vec<_>>()
    .join(",")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn users_row_shows_restricted_operations() {
        let registry = ResourceRegistry::standard();
        let row = describe(&registry.get("users").unwrap());
        assert_eq!(row[0], "/api/users");
        assert_eq!(row[3], "userId asc");
        assert_eq!(row[4], "list,get,update");
    }

    #[test]
    fn unsorted_resource_shows_placeholder() {
        let registry = ResourceRegistry::standard();
        let row = describe(&registry.get("positions").unwrap());
        assert_eq!(row[3], "-");
        assert_eq!(row[4], "list,get,create,update,delete");
    }
}
