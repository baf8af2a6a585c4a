//! Descriptor table for every remote method.
//!
//! Each endpoint client picks its descriptor from here; the transport derives
//! the HTTP verb, body encoding and `Authorization` header from it.

/// HTTP verb used for an endpoint. GET sends parameters in the query string,
/// POST as a URL-encoded form (or multipart for uploads).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verb {
    Get,
    Post,
}

/// Whether an endpoint takes the bearer token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Auth {
    Bearer,
    /// The request's own `code` (or no credential at all) grants access.
    Public,
}

/// One remote method.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Endpoint {
    /// Path relative to the API base URL.
    pub path: &'static str,
    pub verb: Verb,
    pub auth: Auth,
}

impl Endpoint {
    const fn get(path: &'static str) -> Self {
        Self {
            path,
            verb: Verb::Get,
            auth: Auth::Bearer,
        }
    }

    const fn post(path: &'static str) -> Self {
        Self {
            path,
            verb: Verb::Post,
            auth: Auth::Bearer,
        }
    }

    const fn public(path: &'static str) -> Self {
        Self {
            path,
            verb: Verb::Get,
            auth: Auth::Public,
        }
    }

    pub const fn requires_auth(&self) -> bool {
        matches!(self.auth, Auth::Bearer)
    }
}

// Folder
pub const CREATEFOLDER: Endpoint = Endpoint::post("createfolder");
pub const CREATEFOLDERIFNOTEXISTS: Endpoint = Endpoint::post("createfolderifnotexists");
pub const LISTFOLDER: Endpoint = Endpoint::get("listfolder");
pub const RENAMEFOLDER: Endpoint = Endpoint::post("renamefolder");
pub const DELETEFOLDER: Endpoint = Endpoint::post("deletefolder");
pub const DELETEFOLDERRECURSIVE: Endpoint = Endpoint::post("deletefolderrecursive");
pub const COPYFOLDER: Endpoint = Endpoint::get("copyfolder");

// File
pub const UPLOADFILE: Endpoint = Endpoint::post("uploadfile");
pub const UPLOADPROGRESS: Endpoint = Endpoint::get("uploadprogress");
pub const DOWNLOADFILE: Endpoint = Endpoint::get("downloadfile");
pub const DOWNLOADFILEASYNC: Endpoint = Endpoint::get("downloadfileasync");
pub const COPYFILE: Endpoint = Endpoint::post("copyfile");
pub const CHECKSUMFILE: Endpoint = Endpoint::get("checksumfile");
pub const DELETEFILE: Endpoint = Endpoint::post("deletefile");
pub const RENAMEFILE: Endpoint = Endpoint::post("renamefile");
pub const STAT: Endpoint = Endpoint::get("stat");

// Public links
pub const GETFILEPUBLINK: Endpoint = Endpoint::get("getfilepublink");
pub const GETFOLDERPUBLINK: Endpoint = Endpoint::get("getfolderpublink");
pub const GETTREEPUBLINK: Endpoint = Endpoint::get("gettreepublink");
pub const GETPUBLINKDOWNLOAD: Endpoint = Endpoint::public("getpublinkdownload");
pub const SHOWPUBLINK: Endpoint = Endpoint::public("showpublink");
pub const COPYPUBFILE: Endpoint = Endpoint::get("copypubfile");
pub const LISTPUBLINKS: Endpoint = Endpoint::get("listpublinks");
pub const LISTPLSHORT: Endpoint = Endpoint::get("listplshort");
pub const DELETEPUBLINK: Endpoint = Endpoint::post("deletepublink");
pub const CHANGEPUBLINK: Endpoint = Endpoint::post("changepublink");
pub const GETPUBTHUMB: Endpoint = Endpoint::public("getpubthumb");
pub const GETPUBTHUMBLINK: Endpoint = Endpoint::public("getpubthumblink");
pub const GETPUBTHUMBSLINKS: Endpoint = Endpoint::public("getpubthumbslinks");
pub const SAVEPUBTHUMB: Endpoint = Endpoint::post("savepubthumb");
pub const GETPUBZIP: Endpoint = Endpoint::public("getpubzip");
pub const GETPUBZIPLINK: Endpoint = Endpoint::public("getpubziplink");
pub const SAVEPUBZIP: Endpoint = Endpoint::post("savepubzip");
pub const GETPUBVIDEOLINKS: Endpoint = Endpoint::public("getpubvideolinks");
pub const GETPUBAUDIOLINK: Endpoint = Endpoint::public("getpubaudiolink");
pub const GETPUBTEXTFILE: Endpoint = Endpoint::public("getpubtextfile");
pub const GETCOLLECTIONPUBLINK: Endpoint = Endpoint::get("getcollectionpublink");

// Streaming
pub const GETFILELINK: Endpoint = Endpoint::get("getfilelink");
pub const GETVIDEOLINK: Endpoint = Endpoint::get("getvideolink");
pub const GETVIDEOLINKS: Endpoint = Endpoint::get("getvideolinks");
pub const GETAUDIOLINK: Endpoint = Endpoint::get("getaudiolink");
pub const GETHLSLINK: Endpoint = Endpoint::get("gethlslink");
pub const GETTEXTFILE: Endpoint = Endpoint::get("gettextfile");

// Thumbnails
pub const GETTHUMBLINK: Endpoint = Endpoint::get("getthumblink");
pub const GETTHUMBSLINKS: Endpoint = Endpoint::get("getthumbslinks");
pub const GETTHUMB: Endpoint = Endpoint::get("getthumb");
pub const SAVETHUMB: Endpoint = Endpoint::post("savethumb");

// Sharing
pub const SHAREFOLDER: Endpoint = Endpoint::post("sharefolder");
pub const LISTSHARES: Endpoint = Endpoint::get("listshares");
pub const SHAREREQUESTINFO: Endpoint = Endpoint::get("sharerequestinfo");
pub const CANCELSHAREREQUEST: Endpoint = Endpoint::post("cancelsharerequest");
pub const ACCEPTSHARE: Endpoint = Endpoint::post("acceptshare");
pub const DECLINESHARE: Endpoint = Endpoint::post("declineshare");
pub const REMOVESHARE: Endpoint = Endpoint::post("removeshare");
pub const CHANGESHARE: Endpoint = Endpoint::post("changeshare");

// Trash
pub const TRASH_LIST: Endpoint = Endpoint::get("trash_list");
pub const TRASH_RESTOREPATH: Endpoint = Endpoint::get("trash_restorepath");
pub const TRASH_RESTORE: Endpoint = Endpoint::post("trash_restore");
pub const TRASH_CLEAR: Endpoint = Endpoint::post("trash_clear");

// Archiving
pub const GETZIP: Endpoint = Endpoint::get("getzip");
pub const GETZIPLINK: Endpoint = Endpoint::get("getziplink");
pub const SAVEZIP: Endpoint = Endpoint::post("savezip");
pub const EXTRACTARCHIVE: Endpoint = Endpoint::post("extractarchive");
pub const EXTRACTARCHIVEPROGRESS: Endpoint = Endpoint::get("extractarchiveprogress");
pub const SAVEZIPPROGRESS: Endpoint = Endpoint::get("savezipprogress");

// Collections
pub const COLLECTION_LIST: Endpoint = Endpoint::get("collection_list");
pub const COLLECTION_DETAILS: Endpoint = Endpoint::get("collection_details");
pub const COLLECTION_CREATE: Endpoint = Endpoint::post("collection_create");
pub const COLLECTION_RENAME: Endpoint = Endpoint::post("collection_rename");
pub const COLLECTION_DELETE: Endpoint = Endpoint::post("collection_delete");
pub const COLLECTION_LINKFILES: Endpoint = Endpoint::post("collection_linkfiles");
pub const COLLECTION_UNLINKFILES: Endpoint = Endpoint::post("collection_unlinkfiles");
pub const COLLECTION_MOVE: Endpoint = Endpoint::post("collection_move");

// Upload links
pub const CREATEUPLOADLINK: Endpoint = Endpoint::post("createuploadlink");
pub const LISTUPLOADLINKS: Endpoint = Endpoint::get("listuploadlinks");
pub const DELETEUPLOADLINK: Endpoint = Endpoint::post("deleteuploadlink");
pub const CHANGEUPLOADLINK: Endpoint = Endpoint::post("changeuploadlink");
pub const SHOWUPLOADLINK: Endpoint = Endpoint::get("showuploadlink");
pub const UPLOADTOLINK: Endpoint = Endpoint::post("uploadtolink");
pub const UPLOADLINKPROGRESS: Endpoint = Endpoint::get("uploadlinkprogress");
pub const COPYTOLINK: Endpoint = Endpoint::post("copytolink");

// Revisions
pub const LISTREVISIONS: Endpoint = Endpoint::get("listrevisions");
pub const REVERTREVISION: Endpoint = Endpoint::post("revertrevision");

// Transfer
pub const UPLOADTRANSFER: Endpoint = Endpoint::post("uploadtransfer");
pub const UPLOADTRANSFERPROGRESS: Endpoint = Endpoint::get("uploadtransferprogress");

// Auth
pub const OAUTH2_TOKEN: Endpoint = Endpoint::public("oauth2_token");
/// Relative to the OAuth base URL rather than the API base URL.
pub const OAUTH2_AUTHORIZE: Endpoint = Endpoint::public("authorize");

// General
pub const GETDIGEST: Endpoint = Endpoint::get("getdigest");
pub const USERINFO: Endpoint = Endpoint::get("userinfo");
pub const SUPPORTEDLANGUAGES: Endpoint = Endpoint::public("supportedlanguages");
pub const SETLANGUAGE: Endpoint = Endpoint::post("setlanguage");
pub const FEEDBACK: Endpoint = Endpoint::post("feedback");
pub const CURRENTSERVER: Endpoint = Endpoint::public("currentserver");
pub const DIFF: Endpoint = Endpoint::get("diff");
pub const GETFILEHISTORY: Endpoint = Endpoint::get("getfilehistory");
pub const GETIP: Endpoint = Endpoint::public("getip");
pub const GETAPISERVER: Endpoint = Endpoint::public("getapiserver");

/// Every endpoint the client knows about.
pub const ALL: &[Endpoint] = &[
    CREATEFOLDER,
    CREATEFOLDERIFNOTEXISTS,
    LISTFOLDER,
    RENAMEFOLDER,
    DELETEFOLDER,
    DELETEFOLDERRECURSIVE,
    COPYFOLDER,
    UPLOADFILE,
    UPLOADPROGRESS,
    DOWNLOADFILE,
    DOWNLOADFILEASYNC,
    COPYFILE,
    CHECKSUMFILE,
    DELETEFILE,
    RENAMEFILE,
    STAT,
    GETFILEPUBLINK,
    GETFOLDERPUBLINK,
    GETTREEPUBLINK,
    GETPUBLINKDOWNLOAD,
    SHOWPUBLINK,
    COPYPUBFILE,
    LISTPUBLINKS,
    LISTPLSHORT,
    DELETEPUBLINK,
    CHANGEPUBLINK,
    GETPUBTHUMB,
    GETPUBTHUMBLINK,
    GETPUBTHUMBSLINKS,
    SAVEPUBTHUMB,
    GETPUBZIP,
    GETPUBZIPLINK,
    SAVEPUBZIP,
    GETPUBVIDEOLINKS,
    GETPUBAUDIOLINK,
    GETPUBTEXTFILE,
    GETCOLLECTIONPUBLINK,
    GETFILELINK,
    GETVIDEOLINK,
    GETVIDEOLINKS,
    GETAUDIOLINK,
    GETHLSLINK,
    GETTEXTFILE,
    GETTHUMBLINK,
    GETTHUMBSLINKS,
    GETTHUMB,
    SAVETHUMB,
    SHAREFOLDER,
    LISTSHARES,
    SHAREREQUESTINFO,
    CANCELSHAREREQUEST,
    ACCEPTSHARE,
    DECLINESHARE,
    REMOVESHARE,
    CHANGESHARE,
    TRASH_LIST,
    TRASH_RESTOREPATH,
    TRASH_RESTORE,
    TRASH_CLEAR,
    GETZIP,
    GETZIPLINK,
    SAVEZIP,
    EXTRACTARCHIVE,
    EXTRACTARCHIVEPROGRESS,
    SAVEZIPPROGRESS,
    COLLECTION_LIST,
    COLLECTION_DETAILS,
    COLLECTION_CREATE,
    COLLECTION_RENAME,
    COLLECTION_DELETE,
    COLLECTION_LINKFILES,
    COLLECTION_UNLINKFILES,
    COLLECTION_MOVE,
    CREATEUPLOADLINK,
    LISTUPLOADLINKS,
    DELETEUPLOADLINK,
    CHANGEUPLOADLINK,
    SHOWUPLOADLINK,
    UPLOADTOLINK,
    UPLOADLINKPROGRESS,
    COPYTOLINK,
    LISTREVISIONS,
    REVERTREVISION,
    UPLOADTRANSFER,
    UPLOADTRANSFERPROGRESS,
    OAUTH2_TOKEN,
    OAUTH2_AUTHORIZE,
    GETDIGEST,
    USERINFO,
    SUPPORTEDLANGUAGES,
    SETLANGUAGE,
    FEEDBACK,
    CURRENTSERVER,
    DIFF,
    GETFILEHISTORY,
    GETIP,
    GETAPISERVER,
];

/// Looks up an endpoint by path.
pub fn find(path: &str) -> Option<&'static Endpoint> {
    ALL.iter().find(|e| e.path == path)
}
