mod page;
pub use self::page::{
    ErrorBody, PageInfo, ProductEnvelope, ProductListEnvelope, ProductPage, RawPagination,
    GENERIC_SERVER_ERROR,
};

mod product;
pub use self::product::{Product, ProductID};

mod category;
pub use self::category::{Brand, Category};
