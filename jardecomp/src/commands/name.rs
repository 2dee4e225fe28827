use jar_io::{MethodParameterKey, ParameterNamingStrategy};

pub fn print_name(method: &str, index: usize, is_abstract: bool, proposed: Option<&str>) {
    let naming = ParameterNamingStrategy::new();
    let key = MethodParameterKey {
        method,
        index,
        is_abstract,
        proposed,
    };
    println!("{}", naming.name_key(&key));
}
