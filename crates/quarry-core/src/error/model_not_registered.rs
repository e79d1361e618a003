use super::Error;

#[derive(Debug)]
pub(super) struct ModelNotRegistered {
    type_name: &'static str,
}

impl std::error::Error for ModelNotRegistered {}

impl core::fmt::Display for ModelNotRegistered {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "model `{}` is not registered", self.type_name)
    }
}

impl Error {
    pub fn model_not_registered(type_name: &'static str) -> Error {
        Error::from(super::ErrorKind::ModelNotRegistered(ModelNotRegistered {
            type_name,
        }))
    }

    pub fn is_model_not_registered(&self) -> bool {
        self.any(|kind| matches!(kind, super::ErrorKind::ModelNotRegistered(_)))
    }
}
