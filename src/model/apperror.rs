use std::fmt;

/**
 * Represents the type of error that can occur within the application.
 */
#[derive(Debug, Clone, PartialEq)]
pub enum ErrorType {
    /**
     * Startup failed, e.g. configuration or TLS setup.
     */
    Initialization,
    /**
     * The backend could not be reached or answered a read with a failure status.
     */
    Backend,
    /**
     * The address registry could not be reached or answered with a failure status.
     */
    Registry,
    /**
     * A response body could not be decoded.
     */
    Decode,
    /**
     * A submitted form did not satisfy the field constraints.
     */
    Validation,
}

/**
 * Represents an error that occurs within the application.
 */
#[derive(Debug, Clone)]
pub struct ApplicationError {
    /**
     * Error type.
     */
    pub error_type: ErrorType,
    /**
     * Error message describing problem.
     */
    pub message: String,
}

impl ApplicationError {
    /**
     * Creates a new ApplicationError.
     *
     * #Arguments
     * `error_type`: The type of error.
     * `message`: A description of the error.
     */
    pub fn new(error_type: ErrorType, message: String) -> Self {
        ApplicationError { error_type, message }
    }
}

impl fmt::Display for ApplicationError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}
