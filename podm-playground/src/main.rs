use podm_core::{
    Context, Dynamic, JsonObject, Result, SchemaGenerator, TypeRegistry,
    codec::Codec,
};
use podm_codecs::JsonCodec;
use podm_macros::{JsonEnum, JsonObject};

#[derive(Debug, Clone, Copy, PartialEq, Eq, JsonEnum)]
enum Sector {
    #[json_enum(name = "ENERGY")]
    Energy = 1,
    #[json_enum(name = "RETAIL")]
    Retail = 2,
}

#[derive(Debug, Clone, JsonObject)]
#[json_object(namespace = "playground")]
struct Entity {
    #[property(json = "entityId")]
    entity_id: Option<String>,
    #[property(title = "Display name")]
    name: Option<String>,
}

#[derive(Debug, Clone, JsonObject)]
#[json_object(namespace = "playground")]
struct Employee {
    #[property]
    name: Option<String>,
    #[property(default = "0")]
    age: i64,
}

#[derive(Debug, Clone, JsonObject)]
#[json_object(namespace = "playground")]
struct Company {
    #[property(extends)]
    entity: Entity,
    #[property(enum_as_str)]
    sector: Option<Sector>,
    #[property(default_with = "Vec::new")]
    employees: Vec<Employee>,
}

fn employee(name: &str, age: i64) -> Result<Employee> {
    let mut employee = Employee::construct()?;
    employee.set_name(Some(name.into()));
    employee.set_age(age);
    Ok(employee)
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();

    let mut company = Company::construct()?;
    company.entity.set_entity_id(Some("acme-1".into()));
    company.entity.set_name(Some("Acme".into()));
    company.set_sector(Some(Sector::Energy));
    company.set_employees(vec![employee("Ada", 36)?, employee("Linus", 28)?]);

    println!("{company}");

    let registry = TypeRegistry::new()
        .with::<Company>()
        .with::<Employee>();
    let codec = JsonCodec::new(Context::new().with_registry(registry)).pretty(true);

    let data = codec.encode(&company)?;
    log::info!("encoded {} into {} bytes", Company::object_type_name(), data.as_bytes().len());
    println!("{}", String::from_utf8_lossy(data.as_bytes()));

    let back: Option<Company> = codec.decode(&data)?;
    println!("typed round trip equal: {}", back.as_ref() == Some(&company));

    let parsed: Dynamic = codec.decode(&data)?;
    if let Some(parsed) = parsed.downcast_ref::<Company>() {
        println!("untyped decode found {} employees", parsed.get_employees().len());
    }

    let schema = SchemaGenerator::new().generate::<Company>()?;
    println!("{}", serde_json::to_string_pretty(&schema).map_err(|e| podm_core::Error::Encode(e.to_string()))?);

    Ok(())
}
