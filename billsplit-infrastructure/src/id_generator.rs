use billsplit_application::IdGenerator;
use billsplit_domain::ids::random_id;

#[derive(Debug, Default, Clone, Copy)]
pub struct RandomIdGenerator;

impl IdGenerator for RandomIdGenerator {
    fn next_id(&self) -> String {
        random_id().to_string()
    }
}
