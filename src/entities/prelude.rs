pub use super::campo::Entity as Campo;
pub use super::leitura::Entity as Leitura;
