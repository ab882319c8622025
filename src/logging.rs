//! Inicialización de logs del binario.
//!
//! Las librerías del workspace escriben con la fachada `log`; el subscriber
//! de `tracing` reenvía esos registros. Todo va a stderr: stdout queda para la
//! salida JSON de los comandos.
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use crate::config::DEFAULT_LOG_FILTER;

pub fn init_logging(filter: &str) {
    let env_filter = EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    // try_init: un segundo llamado (tests) no debe abortar
    let _ = tracing_subscriber::registry().with(env_filter)
                                          .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                                          .try_init();
}
