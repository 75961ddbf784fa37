pub mod campo;
pub mod leitura;

pub use campo::Entity as Campo;
pub use leitura::Entity as Leitura;

pub mod prelude;
